//! Source keys - the rule origins that can contribute bonuses to a draft.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one active source of attributed bonuses.
///
/// A draft has at most one `Race`, one `Background`, and one `CustomLineage`
/// source active at a time; class entries are keyed by their position in the
/// draft's class list, and ASI features by the owning feature id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum SourceKey {
    Race,
    Background,
    ClassEntry(usize),
    AsiFeature(String),
    CustomLineage,
}

impl SourceKey {
    /// Whether this source is a class entry (class grants take merge priority).
    pub fn is_class(&self) -> bool {
        matches!(self, Self::ClassEntry(_))
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Race => write!(f, "race"),
            Self::Background => write!(f, "background"),
            Self::ClassEntry(index) => write!(f, "class[{}]", index),
            Self::AsiFeature(feature_id) => write!(f, "asi:{}", feature_id),
            Self::CustomLineage => write!(f, "custom-lineage"),
        }
    }
}
