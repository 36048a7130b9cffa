//! Class definitions and class features as delivered by the class catalog.

use serde::{Deserialize, Serialize};

use crate::abilities::Ability;
use crate::skills::EquipmentCategory;
use crate::value_objects::dice::HitDie;

/// Class levels at which an Ability Score Improvement feature unlocks.
pub const ASI_LEVELS: [u8; 5] = [4, 8, 12, 16, 19];

/// Listing entry for class selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummary {
    pub id: String,
    pub name: String,
    pub hit_die: HitDie,
}

/// Skill picks a class grants at level 1 (choose `count` from `pool`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillChoice {
    pub count: u8,
    pub pool: Vec<String>,
}

impl SkillChoice {
    pub fn new(count: u8, pool: Vec<String>) -> Self {
        Self { count, pool }
    }
}

/// Full class definition, normalized at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDefinition {
    pub id: String,
    pub name: String,
    pub hit_die: HitDie,
    pub skill_choices: SkillChoice,
    pub saving_throws: Vec<Ability>,
    /// Granted when this is the character's first class.
    #[serde(default)]
    pub armor_proficiencies: Vec<EquipmentCategory>,
    #[serde(default)]
    pub weapon_proficiencies: Vec<EquipmentCategory>,
    /// Granted instead when the class is taken as a multiclass.
    #[serde(default)]
    pub multiclass_proficiencies: Vec<EquipmentCategory>,
    /// Level at which a subclass must be chosen.
    pub subclass_selection_level: u8,
    #[serde(default)]
    pub subclasses: Vec<String>,
}

impl ClassDefinition {
    /// Equipment proficiencies this class grants, depending on whether it is
    /// the character's first class. Recomputed from the set of classes on
    /// every aggregation rather than ledger-tracked.
    pub fn equipment_grants(&self, is_first_class: bool) -> Vec<EquipmentCategory> {
        if is_first_class {
            self.armor_proficiencies
                .iter()
                .chain(self.weapon_proficiencies.iter())
                .copied()
                .collect()
        } else {
            self.multiclass_proficiencies.clone()
        }
    }

    pub fn summary(&self) -> ClassSummary {
        ClassSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            hit_die: self.hit_die,
        }
    }
}

/// A feature granted by a class at a given level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassFeature {
    pub id: String,
    pub class_id: String,
    #[serde(default)]
    pub subclass_id: Option<String>,
    pub name: String,
    /// Level at which this feature is gained.
    pub level: u8,
    pub description: String,
    /// Hidden features are omitted from listings unless explicitly requested.
    #[serde(default)]
    pub hidden: bool,
}

impl ClassFeature {
    pub fn new(
        id: impl Into<String>,
        class_id: impl Into<String>,
        name: impl Into<String>,
        level: u8,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            class_id: class_id.into(),
            subclass_id: None,
            name: name.into(),
            level,
            description: description.into(),
            hidden: false,
        }
    }

    /// Whether this feature grants an ability score improvement.
    ///
    /// Detection is by name: contains "ability score improvement" or "asi",
    /// case-insensitive.
    pub fn is_ability_score_improvement(&self) -> bool {
        let name = self.name.to_lowercase();
        name.contains("ability score improvement") || name.contains("asi")
    }
}
