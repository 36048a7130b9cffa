//! Feat definitions.

use serde::{Deserialize, Serialize};

/// A feat a character can take in place of an ability score improvement,
/// or receive from a lineage. Freeform name plus description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatDefinition {
    pub name: String,
    pub description: String,
}

impl FeatDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feat_equality() {
        let feat = FeatDefinition::new("Tough", "Your hit point maximum increases.");
        assert_eq!(feat, feat.clone());
        assert_eq!(feat.name, "Tough");
    }
}
