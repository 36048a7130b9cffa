//! Point-buy ability allocation.
//!
//! Base scores range over [8,15] against a fixed 27-point budget. Only the
//! base is charged points; ledger bonuses are free and never clamped.

use crate::abilities::{Ability, AbilityScores};
use crate::error::DomainError;

/// Total points available to spend.
pub const POINT_BUDGET: i32 = 27;

/// Lowest purchasable base score.
pub const MIN_SCORE: i32 = 8;

/// Highest purchasable base score.
pub const MAX_SCORE: i32 = 15;

/// Point cost of one base score: 1 point per step up to 13, 2 per step after.
pub fn cost(value: i32) -> i32 {
    if value < MIN_SCORE {
        0
    } else if value <= 13 {
        value - MIN_SCORE
    } else {
        5 + 2 * (value.min(MAX_SCORE) - 13)
    }
}

/// Points currently spent, derived purely from base values.
pub fn total_spent(base: &AbilityScores) -> i32 {
    Ability::ALL.iter().map(|a| cost(base.get(*a))).sum()
}

/// Whether the budget is spent exactly (the gate for hit-point rolling).
pub fn is_fully_spent(base: &AbilityScores) -> bool {
    total_spent(base) == POINT_BUDGET
}

/// Points left in the budget.
pub fn remaining(base: &AbilityScores) -> i32 {
    POINT_BUDGET - total_spent(base)
}

/// Attempt a direct edit of one base score.
///
/// Rejects values outside [8,15], and increases whose incremental cost would
/// push total spending above the budget. Decreases always fit.
pub fn try_set_base(
    base: &mut AbilityScores,
    ability: Ability,
    value: i32,
) -> Result<(), DomainError> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
        return Err(DomainError::validation(format!(
            "{} must be between {} and {}",
            ability, MIN_SCORE, MAX_SCORE
        )));
    }

    let current = base.get(ability);
    let increment = cost(value) - cost(current);
    if value > current && total_spent(base) + increment > POINT_BUDGET {
        return Err(DomainError::validation(format!(
            "raising {} to {} costs {} points but only {} remain",
            ability,
            value,
            increment,
            remaining(base)
        )));
    }

    base.set(ability, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_table() {
        assert_eq!(cost(8), 0);
        assert_eq!(cost(9), 1);
        assert_eq!(cost(13), 5);
        assert_eq!(cost(14), 7);
        assert_eq!(cost(15), 9);
    }

    #[test]
    fn default_base_spends_nothing() {
        let base = AbilityScores::default();
        assert_eq!(total_spent(&base), 0);
        assert_eq!(remaining(&base), POINT_BUDGET);
        assert!(!is_fully_spent(&base));
    }

    #[test]
    fn rejects_values_outside_range() {
        let mut base = AbilityScores::default();
        assert!(try_set_base(&mut base, Ability::Strength, 7).is_err());
        assert!(try_set_base(&mut base, Ability::Strength, 16).is_err());
        assert_eq!(base.get(Ability::Strength), 8);
    }

    #[test]
    fn rejects_increase_over_budget() {
        let mut base = AbilityScores::default();
        // Three 15s cost 27 points; a fourth increase must fail.
        try_set_base(&mut base, Ability::Strength, 15).unwrap();
        try_set_base(&mut base, Ability::Dexterity, 15).unwrap();
        try_set_base(&mut base, Ability::Constitution, 15).unwrap();
        assert!(is_fully_spent(&base));

        let err = try_set_base(&mut base, Ability::Wisdom, 9).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(base.get(Ability::Wisdom), 8);
    }

    #[test]
    fn decrease_always_fits() {
        let mut base = AbilityScores::default();
        try_set_base(&mut base, Ability::Strength, 15).unwrap();
        try_set_base(&mut base, Ability::Strength, 10).unwrap();
        assert_eq!(total_spent(&base), 2);
    }

    #[test]
    fn all_tens_spend_twelve_points() {
        let mut base = AbilityScores::default();
        for ability in Ability::ALL {
            try_set_base(&mut base, ability, 10).unwrap();
        }
        assert_eq!(total_spent(&base), 12);
    }

    #[test]
    fn spent_is_independent_of_bonuses() {
        // total_spent reads base values only; resolved finals are elsewhere
        let mut base = AbilityScores::default();
        try_set_base(&mut base, Ability::Charisma, 14).unwrap();
        assert_eq!(total_spent(&base), 7);
    }
}
