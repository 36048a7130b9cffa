//! The immutable creation record emitted on finalize.
//!
//! This is the sole contract with the rest of the application; its shape is
//! stable regardless of how the ledger computed the values inside it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::abilities::{Ability, AbilityScores};
use crate::catalog::FeatDefinition;
use crate::skills::{EquipmentCategory, ProficiencyLevel};

/// Armor class with no armor equipped: 10 + DEX modifier.
pub fn unarmored_armor_class(dexterity_modifier: i32) -> i32 {
    10 + dexterity_modifier
}

/// Initiative bonus: the DEX modifier.
pub fn initiative(dexterity_modifier: i32) -> i32 {
    dexterity_modifier
}

/// One finalized class with its level and subclass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedClass {
    pub class_id: String,
    pub name: String,
    pub level: u8,
    pub subclass: Option<String>,
}

/// The finalized character emitted by a completed creation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterCreationRecord {
    pub name: String,
    pub classes: Vec<ResolvedClass>,
    /// All race ids on the record, with one marked main.
    pub race_ids: Vec<String>,
    pub main_race_id: String,
    pub background_id: String,
    pub ability_scores: AbilityScores,
    pub skills: BTreeMap<String, ProficiencyLevel>,
    pub saving_throws: Vec<Ability>,
    pub tools: Vec<String>,
    pub equipment_proficiencies: Vec<EquipmentCategory>,
    pub languages: Vec<String>,
    pub max_hit_points: i32,
    pub current_hit_points: i32,
    pub speed: u32,
    pub armor_class: i32,
    pub initiative: i32,
    pub feats: Vec<FeatDefinition>,
    pub starting_money_gp: u32,
    pub starting_equipment: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combat_stats_follow_dexterity() {
        assert_eq!(unarmored_armor_class(2), 12);
        assert_eq!(unarmored_armor_class(-1), 9);
        assert_eq!(initiative(3), 3);
        assert_eq!(initiative(-2), -2);
    }

    #[test]
    fn record_serializes_with_stable_field_names() {
        let record = CharacterCreationRecord {
            name: "Sera".into(),
            classes: vec![ResolvedClass {
                class_id: "fighter".into(),
                name: "Fighter".into(),
                level: 1,
                subclass: None,
            }],
            race_ids: vec!["human".into()],
            main_race_id: "human".into(),
            background_id: "soldier".into(),
            ability_scores: AbilityScores::uniform(11),
            skills: BTreeMap::new(),
            saving_throws: vec![Ability::Strength, Ability::Constitution],
            tools: vec![],
            equipment_proficiencies: vec![],
            languages: vec!["Common".into()],
            max_hit_points: 12,
            current_hit_points: 12,
            speed: 30,
            armor_class: 10,
            initiative: 0,
            feats: vec![],
            starting_money_gp: 10,
            starting_equipment: vec![],
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&record).expect("record serializes");
        assert_eq!(json["mainRaceId"], "human");
        assert_eq!(json["maxHitPoints"], 12);
        assert_eq!(json["abilityScores"]["strength"], 11);
    }
}
