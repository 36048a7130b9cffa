//! Ability Score Improvement selections.
//!
//! Each unlocked ASI feature is its own source: switching a selection away
//! from ability scores reverts exactly the bonuses that choice contributed,
//! through the same ledger contract every other source uses.

use serde::{Deserialize, Serialize};

use crate::abilities::Ability;
use crate::catalog::{FeatDefinition, ASI_LEVELS};
use crate::error::DomainError;
use crate::value_objects::bonus::{BonusKind, ContributionSet};
use crate::value_objects::source::SourceKey;

/// ASI feature levels unlocked at a given class level.
pub fn unlocked_asi_levels(class_level: u8) -> impl Iterator<Item = u8> {
    ASI_LEVELS.into_iter().filter(move |l| *l <= class_level)
}

/// What the user chose for one ASI feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum AsiChoice {
    /// An ability split: `first` alone receives +2; with `second` set and
    /// distinct, each receives +1.
    AbilityScores {
        first: Option<Ability>,
        second: Option<Ability>,
    },
    /// A feat instead of ability scores.
    Feat(FeatDefinition),
}

/// The selection state of one unlocked ASI feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsiSelection {
    feature_id: String,
    feature_name: String,
    choice: AsiChoice,
}

impl AsiSelection {
    /// Default selection for a newly unlocked feature: ability scores chosen,
    /// no abilities picked yet.
    pub fn new(feature_id: impl Into<String>, feature_name: impl Into<String>) -> Self {
        Self {
            feature_id: feature_id.into(),
            feature_name: feature_name.into(),
            choice: AsiChoice::AbilityScores {
                first: None,
                second: None,
            },
        }
    }

    pub fn feature_id(&self) -> &str {
        &self.feature_id
    }

    pub fn feature_name(&self) -> &str {
        &self.feature_name
    }

    pub fn choice(&self) -> &AsiChoice {
        &self.choice
    }

    /// The ledger key for this selection's contributions.
    pub fn source_key(&self) -> SourceKey {
        SourceKey::AsiFeature(self.feature_id.clone())
    }

    /// Switch to (or update) the ability-scores choice.
    ///
    /// Picking the same ability for both slots is rejected, not coerced.
    pub fn set_ability_picks(
        &mut self,
        first: Option<Ability>,
        second: Option<Ability>,
    ) -> Result<(), DomainError> {
        if second.is_some() && first.is_none() {
            return Err(DomainError::validation(
                "second ability pick requires a first pick",
            ));
        }
        if let (Some(a), Some(b)) = (first, second) {
            if a == b {
                return Err(DomainError::validation(format!(
                    "cannot pick {} for both ability slots",
                    a
                )));
            }
        }
        self.choice = AsiChoice::AbilityScores { first, second };
        Ok(())
    }

    /// Switch to the feat choice.
    pub fn choose_feat(&mut self, feat: FeatDefinition) {
        self.choice = AsiChoice::Feat(feat);
    }

    /// Whether the choice is complete enough to finalize.
    pub fn is_complete(&self) -> bool {
        match &self.choice {
            AsiChoice::AbilityScores { first, .. } => first.is_some(),
            AsiChoice::Feat(_) => true,
        }
    }

    /// Compute the contribution of the current choice.
    pub fn contribution(&self) -> ContributionSet {
        let mut set = ContributionSet::for_source(self.source_key());
        match &self.choice {
            AsiChoice::AbilityScores {
                first: Some(first),
                second: Some(second),
            } => {
                set.push(BonusKind::AbilityScore {
                    ability: *first,
                    amount: 1,
                });
                set.push(BonusKind::AbilityScore {
                    ability: *second,
                    amount: 1,
                });
            }
            AsiChoice::AbilityScores {
                first: Some(first),
                second: None,
            } => {
                set.push(BonusKind::AbilityScore {
                    ability: *first,
                    amount: 2,
                });
            }
            AsiChoice::AbilityScores { first: None, .. } => {}
            AsiChoice::Feat(feat) => {
                set.push(BonusKind::GrantedFeat { feat: feat.clone() });
            }
        }
        set
    }
}
