//! Unified error types for the domain layer
//!
//! Provides a common error type that can be used across all domain operations,
//! enabling consistent error handling without forcing adapters to use String or anyhow.

use thiserror::Error;

use crate::value_objects::DiceParseError;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone)]
pub enum DomainError {
    /// Validation failed (user-correctable; the draft is left unchanged)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Business rule violation
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Parse error (for value objects and catalog normalization)
    #[error("Parse error: {0}")]
    Parse(String),

    /// State transition not allowed
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// Engine invariant broken (programmer error, never user-correctable)
    #[error("Invariant violation: {0}")]
    Invariant(String),
}

impl DomainError {
    /// Creates a validation error for user-correctable failures.
    ///
    /// Use this when a required choice is incomplete or a requested edit
    /// falls outside the allowed range:
    /// - Point-buy edits outside [8,15] or over budget
    /// - Skill-choice count not met
    /// - ASI feature selected but incomplete
    ///
    /// # Example
    /// ```ignore
    /// if name.is_empty() {
    ///     return Err(DomainError::validation("Character name cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures
    /// and catalog rows that cannot be normalized.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid state transition error
    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }

    /// Creates an invariant violation.
    ///
    /// These indicate programmer error (an apply without a matching revert,
    /// a negative ability score, total level above 20). Callers abort the
    /// current operation, leave the last-known-good draft state, and log
    /// loudly; the error is never shown as a correctable message.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// Whether this error is fatal to the session rather than user-correctable.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::Invariant(_))
    }
}

impl From<DiceParseError> for DomainError {
    fn from(err: DiceParseError) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("name cannot be empty");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: name cannot be empty");
        assert!(!err.is_invariant_violation());
    }

    #[test]
    fn test_constraint_error() {
        let err = DomainError::constraint("total level cannot exceed 20");
        assert!(matches!(err, DomainError::Constraint(_)));
        assert_eq!(
            err.to_string(),
            "Constraint violation: total level cannot exceed 20"
        );
    }

    #[test]
    fn test_invariant_error_is_fatal() {
        let err = DomainError::invariant("revert without matching apply");
        assert!(err.is_invariant_violation());
        assert!(err.to_string().contains("revert without matching apply"));
    }

    #[test]
    fn test_from_dice_parse_error() {
        let dice_err = DiceParseError::Empty;
        let domain_err: DomainError = dice_err.into();
        assert!(matches!(domain_err, DomainError::Parse(_)));
        assert!(domain_err.to_string().contains("Empty die formula"));
    }
}
