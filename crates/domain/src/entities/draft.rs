//! The character draft - the single mutable record under construction.
//!
//! Owned exclusively by one wizard session; mutated through ledger
//! apply/revert and the direct point-buy / hit-point operations; finalized
//! into an immutable creation record or discarded on cancel.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::abilities::{Ability, AbilityScores};
use crate::asi::AsiSelection;
use crate::catalog::FeatDefinition;
use crate::contributions::{BackgroundChoices, RaceChoices};
use crate::error::DomainError;
use crate::hit_points::HitPointRoll;
use crate::ids::DraftId;
use crate::ledger::ModifierLedger;
use crate::point_buy;
use crate::resolvers::ability as ability_resolver;
use crate::value_objects::dice::HitDie;

/// Default walking speed when no active source sets one.
pub const DEFAULT_SPEED: u32 = 30;

/// Maximum total character level across all classes.
pub const MAX_TOTAL_LEVEL: u8 = 20;

/// One class the character has levels in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassEntry {
    pub class_id: String,
    pub name: String,
    pub level: u8,
    pub subclass: Option<String>,
    /// Skill proficiencies chosen for this class entry.
    pub chosen_skills: Vec<String>,
    pub hit_die: HitDie,
}

impl ClassEntry {
    pub fn new(class_id: impl Into<String>, name: impl Into<String>, hit_die: HitDie) -> Self {
        Self {
            class_id: class_id.into(),
            name: name.into(),
            level: 1,
            subclass: None,
            chosen_skills: Vec::new(),
            hit_die,
        }
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_subclass(mut self, subclass: impl Into<String>) -> Self {
        self.subclass = Some(subclass.into());
        self
    }

    pub fn with_chosen_skills(mut self, skills: Vec<String>) -> Self {
        self.chosen_skills = skills;
        self
    }
}

/// The user's custom-lineage choice: a +2 ability, an optional skill, and an
/// optional feat, applied as its own source alongside the race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomLineageChoice {
    pub ability: Ability,
    pub skill: Option<String>,
    pub feat: Option<FeatDefinition>,
}

/// The in-progress character record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDraft {
    pub id: DraftId,
    pub name: String,
    /// Point-buy base scores; final scores are resolved on demand.
    base_scores: AbilityScores,
    pub race_id: Option<String>,
    pub race_choices: RaceChoices,
    pub custom_lineage: Option<CustomLineageChoice>,
    pub background_id: Option<String>,
    pub background_choices: BackgroundChoices,
    class_entries: Vec<ClassEntry>,
    /// Selections keyed by ASI feature id.
    pub asi_selections: BTreeMap<String, AsiSelection>,
    hit_points: Option<HitPointRoll>,
    ledger: ModifierLedger,
    pub created_at: DateTime<Utc>,
}

impl CharacterDraft {
    /// Open a fresh draft: all abilities at 8, no proficiencies, speed 30.
    pub fn new() -> Self {
        Self {
            id: DraftId::new(),
            name: String::new(),
            base_scores: AbilityScores::default(),
            race_id: None,
            race_choices: RaceChoices::default(),
            custom_lineage: None,
            background_id: None,
            background_choices: BackgroundChoices::default(),
            class_entries: Vec::new(),
            asi_selections: BTreeMap::new(),
            hit_points: None,
            ledger: ModifierLedger::new(),
            created_at: Utc::now(),
        }
    }

    pub fn base_scores(&self) -> &AbilityScores {
        &self.base_scores
    }

    pub fn ledger(&self) -> &ModifierLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut ModifierLedger {
        &mut self.ledger
    }

    pub fn class_entries(&self) -> &[ClassEntry] {
        &self.class_entries
    }

    pub fn hit_points(&self) -> Option<&HitPointRoll> {
        self.hit_points.as_ref()
    }

    // ──────────────────────────────────────────────────────────────────────
    // Point buy
    // ──────────────────────────────────────────────────────────────────────

    /// Direct point-buy edit of one base score.
    pub fn try_set_base_score(&mut self, ability: Ability, value: i32) -> Result<(), DomainError> {
        point_buy::try_set_base(&mut self.base_scores, ability, value)
    }

    pub fn points_spent(&self) -> i32 {
        point_buy::total_spent(&self.base_scores)
    }

    pub fn is_point_buy_complete(&self) -> bool {
        point_buy::is_fully_spent(&self.base_scores)
    }

    // ──────────────────────────────────────────────────────────────────────
    // Classes
    // ──────────────────────────────────────────────────────────────────────

    pub fn total_level(&self) -> u8 {
        self.class_entries.iter().map(|e| e.level).sum()
    }

    /// Add a class entry, returning its index (the ledger source key).
    pub fn add_class_entry(&mut self, entry: ClassEntry) -> Result<usize, DomainError> {
        if entry.level == 0 {
            return Err(DomainError::validation("class level must be at least 1"));
        }
        if self
            .class_entries
            .iter()
            .any(|e| e.class_id == entry.class_id)
        {
            return Err(DomainError::validation(format!(
                "{} is already one of the character's classes",
                entry.name
            )));
        }
        if self.total_level() + entry.level > MAX_TOTAL_LEVEL {
            return Err(DomainError::constraint(format!(
                "total level cannot exceed {}",
                MAX_TOTAL_LEVEL
            )));
        }
        self.class_entries.push(entry);
        self.hit_points = None;
        Ok(self.class_entries.len() - 1)
    }

    /// Change the level of one class entry.
    pub fn set_class_level(&mut self, index: usize, level: u8) -> Result<(), DomainError> {
        if !(1..=MAX_TOTAL_LEVEL).contains(&level) {
            return Err(DomainError::validation(format!(
                "class level must be between 1 and {}",
                MAX_TOTAL_LEVEL
            )));
        }
        let other_levels: u8 = self
            .class_entries
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, e)| e.level)
            .sum();
        if other_levels + level > MAX_TOTAL_LEVEL {
            return Err(DomainError::constraint(format!(
                "total level cannot exceed {}",
                MAX_TOTAL_LEVEL
            )));
        }
        let entry = self
            .class_entries
            .get_mut(index)
            .ok_or_else(|| DomainError::invariant(format!("no class entry at index {}", index)))?;
        entry.level = level;
        self.hit_points = None;
        Ok(())
    }

    pub fn class_entry_mut(&mut self, index: usize) -> Result<&mut ClassEntry, DomainError> {
        self.class_entries
            .get_mut(index)
            .ok_or_else(|| DomainError::invariant(format!("no class entry at index {}", index)))
    }

    /// Remove the last class entry. Indexed source keys stay stable because
    /// only the tail can be removed.
    pub fn pop_class_entry(&mut self) -> Option<ClassEntry> {
        let entry = self.class_entries.pop();
        if entry.is_some() {
            self.hit_points = None;
        }
        entry
    }

    // ──────────────────────────────────────────────────────────────────────
    // Derived values
    // ──────────────────────────────────────────────────────────────────────

    /// Final ability scores: point-buy base plus all active ledger bonuses.
    pub fn resolved_abilities(&self) -> AbilityScores {
        ability_resolver::resolve(&self.base_scores, &self.ledger)
    }

    pub fn constitution_modifier(&self) -> i32 {
        self.resolved_abilities().modifier_of(Ability::Constitution)
    }

    /// Walking speed: the most recent speed-setting source, or the default.
    pub fn speed(&self) -> u32 {
        self.ledger.active_speed().unwrap_or(DEFAULT_SPEED)
    }

    // ──────────────────────────────────────────────────────────────────────
    // Hit points
    // ──────────────────────────────────────────────────────────────────────

    /// Store the session's hit-point roll. Rejected when one already exists;
    /// re-rolling is not permitted within a session.
    pub fn set_hit_points(&mut self, roll: HitPointRoll) -> Result<(), DomainError> {
        if self.hit_points.is_some() {
            return Err(DomainError::invalid_state_transition(
                "hit points have already been rolled for this draft",
            ));
        }
        self.hit_points = Some(roll);
        Ok(())
    }
}

impl Default for CharacterDraft {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn fresh_draft_defaults() {
        let draft = CharacterDraft::new();
        assert_eq!(draft.base_scores().get(Ability::Strength), 8);
        assert_eq!(draft.speed(), DEFAULT_SPEED);
        assert_eq!(draft.total_level(), 0);
        assert!(draft.ledger().is_empty());
        assert!(draft.hit_points().is_none());
        assert_eq!(draft.points_spent(), 0);
    }

    #[test]
    fn duplicate_class_rejected() {
        let mut draft = CharacterDraft::new();
        draft
            .add_class_entry(ClassEntry::new("fighter", "Fighter", HitDie::D10))
            .unwrap();
        let err = draft
            .add_class_entry(ClassEntry::new("fighter", "Fighter", HitDie::D10))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn total_level_capped_at_twenty() {
        let mut draft = CharacterDraft::new();
        draft
            .add_class_entry(ClassEntry::new("fighter", "Fighter", HitDie::D10).with_level(18))
            .unwrap();
        let err = draft
            .add_class_entry(ClassEntry::new("wizard", "Wizard", HitDie::D6).with_level(3))
            .unwrap_err();
        assert!(matches!(err, DomainError::Constraint(_)));

        draft
            .add_class_entry(ClassEntry::new("wizard", "Wizard", HitDie::D6).with_level(2))
            .unwrap();
        assert_eq!(draft.total_level(), 20);

        let err = draft.set_class_level(1, 3).unwrap_err();
        assert!(matches!(err, DomainError::Constraint(_)));
    }

    #[test]
    fn class_changes_void_the_hit_point_roll() {
        let mut draft = CharacterDraft::new();
        let index = draft
            .add_class_entry(ClassEntry::new("fighter", "Fighter", HitDie::D10).with_level(2))
            .unwrap();

        let mut rng = StdRng::seed_from_u64(11);
        let roll = HitPointRoll::roll(draft.class_entries(), &mut rng);
        draft.set_hit_points(roll).unwrap();
        assert!(draft.hit_points().is_some());

        draft.set_class_level(index, 3).unwrap();
        assert!(draft.hit_points().is_none());
    }

    #[test]
    fn second_roll_rejected_while_first_exists() {
        let mut draft = CharacterDraft::new();
        draft
            .add_class_entry(ClassEntry::new("fighter", "Fighter", HitDie::D10))
            .unwrap();

        let mut rng = StdRng::seed_from_u64(13);
        let roll = HitPointRoll::roll(draft.class_entries(), &mut rng);
        draft.set_hit_points(roll.clone()).unwrap();

        let err = draft.set_hit_points(roll).unwrap_err();
        assert!(matches!(err, DomainError::InvalidStateTransition(_)));
    }
}
