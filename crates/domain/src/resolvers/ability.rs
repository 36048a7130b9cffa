//! Ability score resolution.
//!
//! Final scores are always point-buy base plus the sum of active ledger
//! bonuses for the ability; finals are never clamped.

use crate::abilities::{Ability, AbilityScores};
use crate::catalog::{AbilityChoice, CHOICE_PER_ABILITY_CAP};
use crate::error::DomainError;
use crate::ledger::ModifierLedger;

/// Resolve the six final ability scores.
pub fn resolve(base: &AbilityScores, ledger: &ModifierLedger) -> AbilityScores {
    let mut resolved = *base;
    for ability in Ability::ALL {
        resolved.set(
            ability,
            base.get(ability) + ledger.ability_bonus_total(ability),
        );
    }
    resolved
}

/// Tracks picks within one multi-slot ability choice.
///
/// The cap is per feature: an ability may receive at most two +1-equivalent
/// picks within a single multi-slot choice. Cross-source stacking is not this
/// tracker's concern; the ledger handles that.
#[derive(Debug, Clone, Copy)]
pub struct ChoiceTracker<'a> {
    choice: &'a AbilityChoice,
    picks: &'a [Ability],
}

impl<'a> ChoiceTracker<'a> {
    pub fn new(choice: &'a AbilityChoice, picks: &'a [Ability]) -> Self {
        Self { choice, picks }
    }

    /// Whether another pick of `candidate` is allowed right now.
    pub fn can_pick(&self, candidate: Ability) -> bool {
        if self.picks.len() >= self.choice.count as usize {
            return false;
        }
        if !self.choice.pool.contains(&candidate) {
            return false;
        }
        let already = self.picks.iter().filter(|a| **a == candidate).count();
        already < CHOICE_PER_ABILITY_CAP as usize
    }

    /// Picks still required to complete the choice.
    pub fn remaining(&self) -> u8 {
        (self.choice.count as usize).saturating_sub(self.picks.len()) as u8
    }
}

/// Validate an in-progress pick set for a multi-slot ability choice.
///
/// Picks accumulate one at a time while the wizard is open, so fewer picks
/// than the slot count are fine here; each pick must still be in the pool and
/// under the per-ability cap. Completeness is a separate, step-gating check.
pub fn validate_partial_ability_picks(
    choice: &AbilityChoice,
    picks: &[Ability],
) -> Result<(), DomainError> {
    if picks.len() > choice.count as usize {
        return Err(DomainError::validation(format!(
            "at most {} ability picks allowed, got {}",
            choice.count,
            picks.len()
        )));
    }
    for (index, pick) in picks.iter().enumerate() {
        let tracker = ChoiceTracker::new(choice, &picks[..index]);
        if !tracker.can_pick(*pick) {
            return Err(DomainError::validation(format!(
                "{} is not a legal pick for this bonus",
                pick
            )));
        }
    }
    Ok(())
}

/// Validate a complete pick set for a multi-slot ability choice.
pub fn validate_ability_picks(
    choice: &AbilityChoice,
    picks: &[Ability],
) -> Result<(), DomainError> {
    if picks.len() != choice.count as usize {
        return Err(DomainError::validation(format!(
            "expected {} ability picks, got {}",
            choice.count,
            picks.len()
        )));
    }
    validate_partial_ability_picks(choice, picks)
}
