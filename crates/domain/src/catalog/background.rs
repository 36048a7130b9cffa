//! Background definitions as delivered by the background catalog.

use serde::{Deserialize, Serialize};

use super::{LanguageGrant, ProficiencyGrant};

/// Listing entry for background selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundSummary {
    pub id: String,
    pub name: String,
}

/// Full background definition, normalized at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills: ProficiencyGrant,
    #[serde(default)]
    pub tools: ProficiencyGrant,
    #[serde(default)]
    pub languages: LanguageGrant,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub money: StartingMoney,
    /// Numbered flavor tables (personality traits, ideals, ...). Cosmetic.
    #[serde(default)]
    pub flavor_tables: Vec<FlavorTable>,
}

impl BackgroundDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            skills: ProficiencyGrant::none(),
            tools: ProficiencyGrant::none(),
            languages: LanguageGrant::default(),
            equipment: Vec::new(),
            money: StartingMoney::default(),
            flavor_tables: Vec::new(),
        }
    }

    pub fn with_skills(mut self, skills: ProficiencyGrant) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_tools(mut self, tools: ProficiencyGrant) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_languages(mut self, languages: LanguageGrant) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_equipment(mut self, equipment: Vec<String>, money: StartingMoney) -> Self {
        self.equipment = equipment;
        self.money = money;
        self
    }

    pub fn with_flavor(mut self, table: FlavorTable) -> Self {
        self.flavor_tables.push(table);
        self
    }

    pub fn summary(&self) -> BackgroundSummary {
        BackgroundSummary {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Starting money in gold pieces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartingMoney {
    pub gold: u32,
}

impl StartingMoney {
    pub fn gp(gold: u32) -> Self {
        Self { gold }
    }
}

/// A numbered flavor table (d8 personality traits and the like).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlavorTable {
    pub name: String,
    pub entries: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GrantChoice;

    #[test]
    fn builder_round_trip() {
        let background = BackgroundDefinition::new("soldier", "Soldier")
            .with_skills(ProficiencyGrant::fixed_only(vec![
                "Athletics".into(),
                "Intimidation".into(),
            ]))
            .with_tools(ProficiencyGrant {
                fixed: vec!["Dice set".into()],
                choose: Some(GrantChoice::new(1, vec!["Vehicles (land)".into()])),
            })
            .with_equipment(vec!["Insignia of rank".into()], StartingMoney::gp(10));

        assert_eq!(background.skills.fixed.len(), 2);
        assert_eq!(background.tools.picks_required(), 1);
        assert_eq!(background.money.gold, 10);
        assert_eq!(background.summary().id, "soldier");
    }
}
