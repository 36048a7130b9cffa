//! Race definitions as delivered by the race catalog.

use serde::{Deserialize, Serialize};

use super::ability_increase::AbilityIncrease;
use super::{LanguageGrant, ProficiencyGrant};
use crate::skills::EquipmentCategory;

/// Listing entry for race selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceSummary {
    pub id: String,
    pub name: String,
}

/// Full race definition, normalized at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Walking speed in feet.
    pub speed: u32,
    pub ability_increase: AbilityIncrease,
    #[serde(default)]
    pub skills: ProficiencyGrant,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub languages: LanguageGrant,
    /// Weapon training granted by the race (e.g., dwarven weapon training).
    #[serde(default)]
    pub weapon_training: Vec<EquipmentCategory>,
    /// Flat hit points per character level (e.g., dwarven toughness).
    #[serde(default)]
    pub hp_bonus_per_level: i32,
    #[serde(default)]
    pub traits: Vec<RacialTrait>,
    /// Portrait image URL, cosmetic only.
    #[serde(default)]
    pub image: Option<String>,
}

impl RaceDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        speed: u32,
        ability_increase: AbilityIncrease,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            speed,
            ability_increase,
            skills: ProficiencyGrant::none(),
            tools: Vec::new(),
            languages: LanguageGrant::default(),
            weapon_training: Vec::new(),
            hp_bonus_per_level: 0,
            traits: Vec::new(),
            image: None,
        }
    }

    pub fn with_skills(mut self, skills: ProficiencyGrant) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_languages(mut self, languages: LanguageGrant) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_hp_bonus_per_level(mut self, amount: i32) -> Self {
        self.hp_bonus_per_level = amount;
        self
    }

    pub fn with_weapon_training(mut self, categories: Vec<EquipmentCategory>) -> Self {
        self.weapon_training = categories;
        self
    }

    pub fn with_trait(mut self, racial_trait: RacialTrait) -> Self {
        self.traits.push(racial_trait);
        self
    }

    pub fn summary(&self) -> RaceSummary {
        RaceSummary {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// A named racial trait (darkvision, fey ancestry, ...). Flavor text only;
/// mechanical effects are modeled on the definition fields above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RacialTrait {
    pub name: String,
    pub description: String,
}

impl RacialTrait {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}
