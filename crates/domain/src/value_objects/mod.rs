//! Value objects shared across the draft engine.

pub mod bonus;
pub mod dice;
pub mod source;

pub use bonus::{AttributedBonus, BonusKind, ContributionSet};
pub use dice::{DiceParseError, HitDie};
pub use source::SourceKey;
