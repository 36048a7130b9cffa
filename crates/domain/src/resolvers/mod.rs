//! Resolvers - recompute derived values from base state plus the ledger.

pub mod ability;
pub mod proficiency;

pub use ability::{
    resolve, validate_ability_picks, validate_partial_ability_picks, ChoiceTracker,
};
pub use proficiency::{aggregate, ProficiencySets};
