//! Normalized catalog definitions.
//!
//! Race, class, background, and feat data as the engine consumes it. Backing
//! stores deliver these through the catalog ports; ambiguous wire shapes are
//! normalized here, once, at load time.

pub mod ability_increase;
pub mod background;
pub mod class;
pub mod feat;
pub mod race;

use serde::{Deserialize, Serialize};

pub use ability_increase::{
    AbilityChoice, AbilityIncrease, RawAbilityIncrease, CHOICE_PER_ABILITY_CAP,
};
pub use background::{BackgroundDefinition, BackgroundSummary, FlavorTable, StartingMoney};
pub use class::{ClassDefinition, ClassFeature, ClassSummary, SkillChoice, ASI_LEVELS};
pub use feat::FeatDefinition;
pub use race::{RaceDefinition, RaceSummary, RacialTrait};

/// Fixed proficiencies plus an optional user choice, shared by race and
/// background skill/tool grants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProficiencyGrant {
    /// Proficiencies granted unconditionally.
    #[serde(default)]
    pub fixed: Vec<String>,
    /// Choose `count` from `pool`, on top of the fixed grants.
    #[serde(default)]
    pub choose: Option<GrantChoice>,
}

impl ProficiencyGrant {
    pub fn fixed_only(fixed: Vec<String>) -> Self {
        Self {
            fixed,
            choose: None,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    /// Number of user picks this grant requires.
    pub fn picks_required(&self) -> u8 {
        self.choose.as_ref().map(|c| c.count).unwrap_or(0)
    }
}

/// A choose-N-from-pool slot within a proficiency grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantChoice {
    pub count: u8,
    pub pool: Vec<String>,
}

impl GrantChoice {
    pub fn new(count: u8, pool: Vec<String>) -> Self {
        Self { count, pool }
    }
}

/// Languages granted by a race or background.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageGrant {
    /// Languages granted unconditionally.
    #[serde(default)]
    pub fixed: Vec<String>,
    /// Number of additional languages of the user's choice.
    #[serde(default)]
    pub choose_any: u8,
}

impl LanguageGrant {
    pub fn fixed_only(fixed: Vec<String>) -> Self {
        Self {
            fixed,
            choose_any: 0,
        }
    }
}
