//! Normalized ability-score-increase patterns.
//!
//! Catalog data arrives in several historical shapes (a per-ability table, an
//! `{"all": n}` object, a choose-N object, or an array mixing them). They are
//! decoded once at load time into the closed set below; the engine never
//! branches on wire shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::abilities::Ability;
use crate::error::DomainError;

/// Per-ability cap on +1-equivalent picks within one multi-slot choice.
pub const CHOICE_PER_ABILITY_CAP: u8 = 2;

/// A "choose N abilities, +1 each" slot set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityChoice {
    /// Number of +1 picks the user makes.
    pub count: u8,
    /// Abilities the picks may come from.
    pub pool: Vec<Ability>,
}

impl AbilityChoice {
    pub fn new(count: u8, pool: Vec<Ability>) -> Self {
        Self { count, pool }
    }

    /// Choose from all six abilities.
    pub fn any(count: u8) -> Self {
        Self {
            count,
            pool: Ability::ALL.to_vec(),
        }
    }
}

/// The closed set of ability-increase patterns a race can carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "pattern")]
pub enum AbilityIncrease {
    /// One ability gets a fixed bonus.
    Fixed { ability: Ability, amount: i32 },
    /// Every ability gets the same fixed bonus.
    FixedMulti { amount: i32 },
    /// The user picks N abilities for +1 each.
    Choice(AbilityChoice),
    /// Fixed bonuses plus a user choice (e.g., +2 CHA and two +1 picks).
    Custom {
        fixed: Vec<(Ability, i32)>,
        choice: AbilityChoice,
    },
}

impl AbilityIncrease {
    /// No increase at all (custom-lineage races defer to the lineage choice).
    pub fn none() -> Self {
        Self::Custom {
            fixed: Vec::new(),
            choice: AbilityChoice::new(0, Vec::new()),
        }
    }

    /// Fixed bonuses of this pattern, in canonical ability order.
    pub fn fixed_bonuses(&self) -> Vec<(Ability, i32)> {
        match self {
            Self::Fixed { ability, amount } => vec![(*ability, *amount)],
            Self::FixedMulti { amount } => {
                Ability::ALL.iter().map(|a| (*a, *amount)).collect()
            }
            Self::Choice(_) => Vec::new(),
            Self::Custom { fixed, .. } => fixed.clone(),
        }
    }

    /// The user-choice part of this pattern, if any picks are required.
    pub fn choice(&self) -> Option<&AbilityChoice> {
        match self {
            Self::Choice(choice) => (choice.count > 0).then_some(choice),
            Self::Custom { choice, .. } => (choice.count > 0).then_some(choice),
            _ => None,
        }
    }

    /// Number of user picks this pattern requires.
    pub fn picks_required(&self) -> u8 {
        self.choice().map(|c| c.count).unwrap_or(0)
    }
}

/// Raw wire shapes for ability increases, decoded once at catalog load.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAbilityIncrease {
    /// `{"choose": 2, "from": ["str", "dex"]}` - choose-N object.
    ChooseObject {
        choose: u8,
        #[serde(default)]
        from: Vec<String>,
    },
    /// `{"cha": 2, "str": 1}` or `{"all": 1}` - per-ability table.
    /// A BTreeMap keeps normalization deterministic.
    Table(BTreeMap<String, i32>),
    /// An array mixing tables and choose objects.
    Mixed(Vec<RawAbilityIncrease>),
}

impl RawAbilityIncrease {
    /// Normalize a raw shape into the closed pattern set.
    ///
    /// Rows that would need more than one choice slot set, or a choice whose
    /// count cannot be satisfied under the per-ability cap, fail with a parse
    /// error instead of being silently generalized.
    pub fn normalize(self) -> Result<AbilityIncrease, DomainError> {
        let mut fixed: Vec<(Ability, i32)> = Vec::new();
        let mut all_bonus: Option<i32> = None;
        let mut choice: Option<AbilityChoice> = None;

        self.collect(&mut fixed, &mut all_bonus, &mut choice)?;

        if let Some(amount) = all_bonus {
            if !fixed.is_empty() || choice.is_some() {
                return Err(DomainError::parse(
                    "ability increase mixes an \"all\" bonus with other entries",
                ));
            }
            return Ok(AbilityIncrease::FixedMulti { amount });
        }

        if let Some(choice) = &choice {
            let capacity = choice.pool.len() as u8 * CHOICE_PER_ABILITY_CAP;
            if choice.pool.is_empty() || choice.count > capacity {
                return Err(DomainError::parse(format!(
                    "ability choice of {} picks cannot be satisfied from a pool of {}",
                    choice.count,
                    choice.pool.len()
                )));
            }
        }

        Ok(match (fixed.len(), choice) {
            (0, None) => AbilityIncrease::none(),
            (0, Some(choice)) => AbilityIncrease::Choice(choice),
            (1, None) => {
                let (ability, amount) = fixed[0];
                AbilityIncrease::Fixed { ability, amount }
            }
            (_, None) => AbilityIncrease::Custom {
                fixed,
                choice: AbilityChoice::new(0, Vec::new()),
            },
            (_, Some(choice)) => AbilityIncrease::Custom { fixed, choice },
        })
    }

    fn collect(
        self,
        fixed: &mut Vec<(Ability, i32)>,
        all_bonus: &mut Option<i32>,
        choice: &mut Option<AbilityChoice>,
    ) -> Result<(), DomainError> {
        match self {
            Self::Table(table) => {
                for (key, amount) in table {
                    if key.eq_ignore_ascii_case("all") {
                        *all_bonus = Some(amount);
                    } else {
                        let ability: Ability = key.parse()?;
                        fixed.push((ability, amount));
                    }
                }
            }
            Self::ChooseObject { choose, from } => {
                if choice.is_some() {
                    return Err(DomainError::parse(
                        "ability increase has more than one choice slot",
                    ));
                }
                let pool = if from.is_empty() {
                    Ability::ALL.to_vec()
                } else {
                    from.iter()
                        .map(|name| name.parse())
                        .collect::<Result<Vec<Ability>, _>>()?
                };
                *choice = Some(AbilityChoice::new(choose, pool));
            }
            Self::Mixed(parts) => {
                for part in parts {
                    part.collect(fixed, all_bonus, choice)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Result<AbilityIncrease, DomainError> {
        let raw: RawAbilityIncrease =
            serde_json::from_str(json).map_err(|e| DomainError::parse(e.to_string()))?;
        raw.normalize()
    }

    #[test]
    fn table_with_one_ability_becomes_fixed() {
        let increase = decode(r#"{"cha": 2}"#).unwrap();
        assert_eq!(
            increase,
            AbilityIncrease::Fixed {
                ability: Ability::Charisma,
                amount: 2
            }
        );
    }

    #[test]
    fn all_table_becomes_fixed_multi() {
        let increase = decode(r#"{"all": 1}"#).unwrap();
        assert_eq!(increase, AbilityIncrease::FixedMulti { amount: 1 });
    }

    #[test]
    fn choose_object_becomes_choice() {
        let increase = decode(r#"{"choose": 2, "from": ["str", "dex", "con"]}"#).unwrap();
        match increase {
            AbilityIncrease::Choice(choice) => {
                assert_eq!(choice.count, 2);
                assert_eq!(choice.pool.len(), 3);
            }
            other => panic!("expected Choice, got {:?}", other),
        }
    }

    #[test]
    fn choose_without_pool_defaults_to_all_abilities() {
        let increase = decode(r#"{"choose": 1}"#).unwrap();
        match increase {
            AbilityIncrease::Choice(choice) => assert_eq!(choice.pool, Ability::ALL.to_vec()),
            other => panic!("expected Choice, got {:?}", other),
        }
    }

    #[test]
    fn mixed_array_becomes_custom() {
        let increase =
            decode(r#"[{"cha": 2}, {"choose": 2, "from": ["str", "dex", "con", "int", "wis"]}]"#)
                .unwrap();
        match increase {
            AbilityIncrease::Custom { fixed, choice } => {
                assert_eq!(fixed, vec![(Ability::Charisma, 2)]);
                assert_eq!(choice.count, 2);
            }
            other => panic!("expected Custom, got {:?}", other),
        }
    }

    #[test]
    fn two_choice_slots_rejected() {
        let result = decode(r#"[{"choose": 1}, {"choose": 1}]"#);
        assert!(matches!(result, Err(DomainError::Parse(_))));
    }

    #[test]
    fn oversubscribed_choice_rejected() {
        // 5 picks from a 2-ability pool exceeds the per-ability cap of 2
        let result = decode(r#"{"choose": 5, "from": ["str", "dex"]}"#);
        assert!(matches!(result, Err(DomainError::Parse(_))));
    }

    #[test]
    fn unknown_ability_rejected() {
        let result = decode(r#"{"luck": 2}"#);
        assert!(matches!(result, Err(DomainError::Parse(_))));
    }

    #[test]
    fn fixed_bonuses_of_fixed_multi_cover_every_ability() {
        let increase = AbilityIncrease::FixedMulti { amount: 1 };
        let bonuses = increase.fixed_bonuses();
        assert_eq!(bonuses.len(), 6);
        assert!(bonuses.iter().all(|(_, amount)| *amount == 1));
        assert_eq!(increase.picks_required(), 0);
    }
}
