//! Wizard steps - the ordered creation flow.
//!
//! Each step has an explicit validation gate; advancing is refused until the
//! current step's required choices are complete. Transitions are named and
//! testable without any UI binding.

use serde::{Deserialize, Serialize};

/// The ordered steps of a creation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    Race,
    Class,
    Background,
    Abilities,
    HitPoints,
    Review,
}

impl WizardStep {
    /// All steps in wizard order.
    pub const ALL: [WizardStep; 6] = [
        WizardStep::Race,
        WizardStep::Class,
        WizardStep::Background,
        WizardStep::Abilities,
        WizardStep::HitPoints,
        WizardStep::Review,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Race => "Race",
            Self::Class => "Class",
            Self::Background => "Background",
            Self::Abilities => "Ability Scores",
            Self::HitPoints => "Hit Points",
            Self::Review => "Review",
        }
    }

    /// The step after this one, if any.
    pub fn next(&self) -> Option<WizardStep> {
        let position = Self::ALL.iter().position(|s| s == self)?;
        Self::ALL.get(position + 1).copied()
    }

    /// The step before this one, if any.
    pub fn previous(&self) -> Option<WizardStep> {
        let position = Self::ALL.iter().position(|s| s == self)?;
        position.checked_sub(1).and_then(|p| Self::ALL.get(p)).copied()
    }
}
