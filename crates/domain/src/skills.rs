//! Skill and equipment-proficiency reference data.
//!
//! Read-only catalog: the eighteen skills with their governing abilities,
//! proficiency levels, and the closed set of equipment categories.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::abilities::Ability;

/// All skill names in display order.
pub const SKILL_NAMES: [&str; 18] = [
    "Acrobatics",
    "Animal Handling",
    "Arcana",
    "Athletics",
    "Deception",
    "History",
    "Insight",
    "Intimidation",
    "Investigation",
    "Medicine",
    "Nature",
    "Perception",
    "Performance",
    "Persuasion",
    "Religion",
    "Sleight of Hand",
    "Stealth",
    "Survival",
];

/// Map a skill name to its governing ability.
pub fn skill_ability(skill: &str) -> Option<Ability> {
    match skill {
        "Athletics" => Some(Ability::Strength),
        "Acrobatics" | "Sleight of Hand" | "Stealth" => Some(Ability::Dexterity),
        "Arcana" | "History" | "Investigation" | "Nature" | "Religion" => {
            Some(Ability::Intelligence)
        }
        "Animal Handling" | "Insight" | "Medicine" | "Perception" | "Survival" => {
            Some(Ability::Wisdom)
        }
        "Deception" | "Intimidation" | "Performance" | "Persuasion" => Some(Ability::Charisma),
        _ => None,
    }
}

/// Whether a name is one of the known skills.
pub fn is_known_skill(skill: &str) -> bool {
    skill_ability(skill).is_some()
}

/// How proficient a character is in a skill.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum ProficiencyLevel {
    #[default]
    None,
    Proficient,
    Expertise,
}

impl ProficiencyLevel {
    pub fn is_proficient(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Ordering rank for merge decisions: a level never silently downgrades.
    pub fn rank(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Proficient => 1,
            Self::Expertise => 2,
        }
    }
}

/// A named armor or weapon category a character can be proficient with.
///
/// Closed, enumerable set; merging across sources is a boolean OR.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum EquipmentCategory {
    LightArmor,
    MediumArmor,
    HeavyArmor,
    Shields,
    SimpleWeapons,
    MartialWeapons,
    Daggers,
    Darts,
    Slings,
    Quarterstaffs,
    LightCrossbows,
    HandCrossbows,
    Shortswords,
    Longswords,
    Rapiers,
}

impl EquipmentCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LightArmor => "Light Armor",
            Self::MediumArmor => "Medium Armor",
            Self::HeavyArmor => "Heavy Armor",
            Self::Shields => "Shields",
            Self::SimpleWeapons => "Simple Weapons",
            Self::MartialWeapons => "Martial Weapons",
            Self::Daggers => "Daggers",
            Self::Darts => "Darts",
            Self::Slings => "Slings",
            Self::Quarterstaffs => "Quarterstaffs",
            Self::LightCrossbows => "Light Crossbows",
            Self::HandCrossbows => "Hand Crossbows",
            Self::Shortswords => "Shortswords",
            Self::Longswords => "Longswords",
            Self::Rapiers => "Rapiers",
        }
    }
}

impl fmt::Display for EquipmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
