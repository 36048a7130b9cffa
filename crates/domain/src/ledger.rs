//! The modifier ledger - active sources and their recorded contributions.
//!
//! Every bonus on the draft is attributed to exactly one source, and the set
//! a source contributed is frozen at apply time. Revert subtracts that exact
//! set; it never re-derives from the source's current definition, so a
//! definition changing between apply and revert (the user switching the main
//! race out from under an in-flight choice) cannot under- or over-revert.

use serde::{Deserialize, Serialize};

use crate::abilities::Ability;
use crate::catalog::FeatDefinition;
use crate::error::DomainError;
use crate::skills::{EquipmentCategory, ProficiencyLevel};
use crate::value_objects::bonus::{BonusKind, ContributionSet};
use crate::value_objects::source::SourceKey;

/// One applied source with its frozen contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    key: SourceKey,
    /// Application order; later entries win most-recent merge decisions.
    seq: u64,
    contribution: ContributionSet,
}

impl LedgerEntry {
    pub fn key(&self) -> &SourceKey {
        &self.key
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn contribution(&self) -> &ContributionSet {
        &self.contribution
    }
}

/// Ordered collection of active sources and their attributed bonuses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierLedger {
    entries: Vec<LedgerEntry>,
    next_seq: u64,
}

impl ModifierLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a source's contribution.
    ///
    /// The contribution must have been computed for `key`; applying a source
    /// that is already active is an invariant violation (replace is
    /// revert-then-apply, ordered by the caller).
    pub fn apply(
        &mut self,
        key: SourceKey,
        contribution: ContributionSet,
    ) -> Result<(), DomainError> {
        if contribution.source() != &key {
            return Err(DomainError::invariant(format!(
                "contribution for {} applied under key {}",
                contribution.source(),
                key
            )));
        }
        if self.is_applied(&key) {
            return Err(DomainError::invariant(format!(
                "source {} applied twice without an intervening revert",
                key
            )));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(LedgerEntry {
            key,
            seq,
            contribution,
        });
        Ok(())
    }

    /// Remove a source, returning the exact contribution recorded at apply.
    pub fn revert(&mut self, key: &SourceKey) -> Result<ContributionSet, DomainError> {
        let index = self
            .entries
            .iter()
            .position(|e| &e.key == key)
            .ok_or_else(|| {
                DomainError::invariant(format!("revert of {} without a matching apply", key))
            })?;
        Ok(self.entries.remove(index).contribution)
    }

    /// Remove a source if it is active; `None` when it was not applied.
    pub fn revert_if_applied(&mut self, key: &SourceKey) -> Option<ContributionSet> {
        self.entries
            .iter()
            .position(|e| &e.key == key)
            .map(|index| self.entries.remove(index).contribution)
    }

    pub fn is_applied(&self, key: &SourceKey) -> bool {
        self.entries.iter().any(|e| &e.key == key)
    }

    /// The frozen contribution of an active source.
    pub fn contribution(&self, key: &SourceKey) -> Option<&ContributionSet> {
        self.entries
            .iter()
            .find(|e| &e.key == key)
            .map(|e| &e.contribution)
    }

    /// Entries in application order.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total attributed bonus for one ability across all active sources.
    pub fn ability_bonus_total(&self, ability: Ability) -> i32 {
        self.entries
            .iter()
            .map(|e| e.contribution.ability_bonus(ability))
            .sum()
    }

    /// Walking speed set by the most recently applied source, if any.
    pub fn active_speed(&self) -> Option<u32> {
        self.entries
            .iter()
            .filter_map(|e| e.contribution.speed().map(|feet| (e.seq, feet)))
            .max_by_key(|(seq, _)| *seq)
            .map(|(_, feet)| feet)
    }

    /// Total flat hit points per character level across all active sources.
    pub fn hp_per_level_total(&self) -> i32 {
        self.entries
            .iter()
            .flat_map(|e| e.contribution.bonuses())
            .filter_map(|b| match b.kind() {
                BonusKind::HitPointsPerLevel { amount } => Some(*amount),
                _ => None,
            })
            .sum()
    }

    /// All skill grants with their source and application order.
    pub fn skill_grants(&self) -> impl Iterator<Item = SkillGrantRef<'_>> + '_ {
        self.entries.iter().flat_map(|e| {
            e.contribution
                .bonuses()
                .iter()
                .filter_map(move |b| match b.kind() {
                    BonusKind::SkillProficiency { skill, level } => Some(SkillGrantRef {
                        source: &e.key,
                        seq: e.seq,
                        skill,
                        level: *level,
                    }),
                    _ => None,
                })
        })
    }

    /// All tool proficiencies from active sources.
    pub fn tool_grants(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .iter()
            .flat_map(|e| e.contribution.bonuses())
            .filter_map(|b| match b.kind() {
                BonusKind::ToolProficiency { tool } => Some(tool.as_str()),
                _ => None,
            })
    }

    /// All languages from active sources.
    pub fn language_grants(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .iter()
            .flat_map(|e| e.contribution.bonuses())
            .filter_map(|b| match b.kind() {
                BonusKind::Language { language } => Some(language.as_str()),
                _ => None,
            })
    }

    /// Equipment proficiencies attributed to non-class sources.
    /// Class-side equipment is recomputed from the set of classes instead.
    pub fn equipment_grants(&self) -> impl Iterator<Item = EquipmentCategory> + '_ {
        self.entries
            .iter()
            .flat_map(|e| e.contribution.bonuses())
            .filter_map(|b| match b.kind() {
                BonusKind::EquipmentProficiency { category } => Some(*category),
                _ => None,
            })
    }

    /// Feats granted by active sources, in application order.
    pub fn granted_feats(&self) -> impl Iterator<Item = &FeatDefinition> + '_ {
        self.entries.iter().flat_map(|e| e.contribution.feats())
    }
}

/// A skill grant as seen by the proficiency aggregator.
#[derive(Debug, Clone, Copy)]
pub struct SkillGrantRef<'a> {
    pub source: &'a SourceKey,
    pub seq: u64,
    pub skill: &'a str,
    pub level: ProficiencyLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn race_contribution() -> ContributionSet {
        let mut set = ContributionSet::for_source(SourceKey::Race);
        set.push(BonusKind::AbilityScore {
            ability: Ability::Charisma,
            amount: 2,
        });
        set.push(BonusKind::Speed { feet: 30 });
        set.push(BonusKind::SkillProficiency {
            skill: "Perception".into(),
            level: ProficiencyLevel::Proficient,
        });
        set
    }

    fn class_contribution(index: usize, skill: &str) -> ContributionSet {
        let mut set = ContributionSet::for_source(SourceKey::ClassEntry(index));
        set.push(BonusKind::SkillProficiency {
            skill: skill.into(),
            level: ProficiencyLevel::Proficient,
        });
        set
    }

    #[test]
    fn apply_then_revert_returns_exact_contribution() {
        let mut ledger = ModifierLedger::new();
        let contribution = race_contribution();
        let expected = contribution.clone();

        ledger.apply(SourceKey::Race, contribution).unwrap();
        assert!(ledger.is_applied(&SourceKey::Race));
        assert_eq!(ledger.ability_bonus_total(Ability::Charisma), 2);

        let reverted = ledger.revert(&SourceKey::Race).unwrap();
        assert_eq!(reverted, expected);
        assert!(ledger.is_empty());
        assert_eq!(ledger.ability_bonus_total(Ability::Charisma), 0);
    }

    #[test]
    fn revert_leaves_other_sources_untouched() {
        let mut ledger = ModifierLedger::new();
        ledger.apply(SourceKey::Race, race_contribution()).unwrap();
        ledger
            .apply(SourceKey::ClassEntry(0), class_contribution(0, "Athletics"))
            .unwrap();

        ledger.revert(&SourceKey::Race).unwrap();

        assert!(ledger.is_applied(&SourceKey::ClassEntry(0)));
        let skills: Vec<_> = ledger.skill_grants().map(|g| g.skill.to_string()).collect();
        assert_eq!(skills, vec!["Athletics"]);
    }

    #[test]
    fn double_apply_is_an_invariant_violation() {
        let mut ledger = ModifierLedger::new();
        ledger.apply(SourceKey::Race, race_contribution()).unwrap();

        let err = ledger
            .apply(SourceKey::Race, race_contribution())
            .unwrap_err();
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn revert_without_apply_is_an_invariant_violation() {
        let mut ledger = ModifierLedger::new();
        let err = ledger.revert(&SourceKey::Background).unwrap_err();
        assert!(err.is_invariant_violation());

        assert!(ledger.revert_if_applied(&SourceKey::Background).is_none());
    }

    #[test]
    fn mismatched_contribution_key_rejected() {
        let mut ledger = ModifierLedger::new();
        let err = ledger
            .apply(SourceKey::Background, race_contribution())
            .unwrap_err();
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn most_recent_speed_wins() {
        let mut ledger = ModifierLedger::new();
        ledger.apply(SourceKey::Race, race_contribution()).unwrap();

        let mut lineage = ContributionSet::for_source(SourceKey::CustomLineage);
        lineage.push(BonusKind::Speed { feet: 35 });
        ledger.apply(SourceKey::CustomLineage, lineage).unwrap();

        assert_eq!(ledger.active_speed(), Some(35));
        ledger.revert(&SourceKey::CustomLineage).unwrap();
        assert_eq!(ledger.active_speed(), Some(30));
    }

    #[test]
    fn sequence_numbers_strictly_increase_across_replaces() {
        let mut ledger = ModifierLedger::new();
        ledger.apply(SourceKey::Race, race_contribution()).unwrap();
        let first_seq = ledger.entries()[0].seq();

        ledger.revert(&SourceKey::Race).unwrap();
        ledger.apply(SourceKey::Race, race_contribution()).unwrap();
        assert!(ledger.entries()[0].seq() > first_seq);
    }

    #[test]
    fn hp_per_level_totals_across_sources() {
        let mut ledger = ModifierLedger::new();
        let mut dwarf = ContributionSet::for_source(SourceKey::Race);
        dwarf.push(BonusKind::HitPointsPerLevel { amount: 1 });
        ledger.apply(SourceKey::Race, dwarf).unwrap();

        assert_eq!(ledger.hp_per_level_total(), 1);
    }
}
