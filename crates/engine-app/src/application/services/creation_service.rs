//! Character Creation Service - the wizard's single mutator.
//!
//! Owns one draft for the duration of a creation or level-up session and
//! sequences every ledger operation. Catalog loads are async, but the draft
//! is only touched after a load resolves: the predecessor source is reverted
//! and the new contribution computed against the settled draft, in that
//! order, synchronously. A load that resolves after the selection moved on
//! (superseded or cancelled) is discarded by generation check, never applied.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, error, info, instrument};

use herodraft_domain::contributions::{
    self, BackgroundChoices, RaceChoices,
};
use herodraft_domain::resolvers::proficiency;
use herodraft_domain::{
    point_buy, Ability, AsiSelection, BackgroundDefinition, CharacterCreationRecord,
    CharacterDraft, ClassDefinition, ClassEntry, CustomLineageChoice, DomainError,
    FeatDefinition, HitPointRoll, HitPointTotal, ProficiencySets, RaceDefinition, ResolvedClass,
    SourceKey, MAX_TOTAL_LEVEL,
};
use herodraft_engine_ports::outbound::{
    BackgroundCatalogPort, ClassCatalogPort, RaceCatalogPort,
};

use super::wizard::WizardStep;

/// Application service driving one creation session.
pub struct CharacterCreationService {
    races: Arc<dyn RaceCatalogPort>,
    classes: Arc<dyn ClassCatalogPort>,
    backgrounds: Arc<dyn BackgroundCatalogPort>,
    draft: CharacterDraft,
    step: WizardStep,
    loaded_race: Option<RaceDefinition>,
    loaded_background: Option<BackgroundDefinition>,
    loaded_classes: BTreeMap<String, ClassDefinition>,
    race_load_generation: u64,
    background_load_generation: u64,
}

impl CharacterCreationService {
    /// Open a new session with a fresh draft.
    pub fn new(
        races: Arc<dyn RaceCatalogPort>,
        classes: Arc<dyn ClassCatalogPort>,
        backgrounds: Arc<dyn BackgroundCatalogPort>,
    ) -> Self {
        Self {
            races,
            classes,
            backgrounds,
            draft: CharacterDraft::new(),
            step: WizardStep::Race,
            loaded_race: None,
            loaded_background: None,
            loaded_classes: BTreeMap::new(),
            race_load_generation: 0,
            background_load_generation: 0,
        }
    }

    pub fn draft(&self) -> &CharacterDraft {
        &self.draft
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    /// Discard any catalog loads still in flight. Called when the user
    /// navigates away; a load resolving afterwards will not touch the draft.
    pub fn cancel_pending_loads(&mut self) {
        self.race_load_generation += 1;
        self.background_load_generation += 1;
    }

    // ──────────────────────────────────────────────────────────────────────
    // Race
    // ──────────────────────────────────────────────────────────────────────

    /// Select (or replace) the main race. Earlier race choices are reset;
    /// the old race's contribution is reverted before the new one is
    /// computed against the settled draft.
    #[instrument(skip(self))]
    pub async fn select_race(&mut self, race_id: &str) -> Result<()> {
        self.race_load_generation += 1;
        let generation = self.race_load_generation;

        let def = self
            .races
            .get_race_details(race_id)
            .await
            .context("Failed to load race from catalog")?
            .ok_or_else(|| anyhow::anyhow!("Race not found: {}", race_id))?;

        self.apply_loaded_race(generation, def)?;
        Ok(())
    }

    /// Apply a resolved race load. Stale loads (the selection changed while
    /// the fetch was in flight) are discarded without touching the draft.
    fn apply_loaded_race(
        &mut self,
        generation: u64,
        def: RaceDefinition,
    ) -> Result<(), DomainError> {
        if generation != self.race_load_generation {
            debug!(race = %def.id, "Discarding stale race load");
            return Ok(());
        }

        let choices = RaceChoices::default();
        self.reapply_race(&def, &choices)?;
        info!(race = %def.id, "Race applied");
        self.draft.race_id = Some(def.id.clone());
        self.draft.race_choices = choices;
        self.loaded_race = Some(def);
        Ok(())
    }

    /// Update the user's picks for the selected race's choice slots.
    pub fn update_race_choices(&mut self, choices: RaceChoices) -> Result<()> {
        let def = self
            .loaded_race
            .clone()
            .ok_or_else(|| DomainError::validation("no race selected"))?;
        self.reapply_race(&def, &choices)?;
        self.draft.race_choices = choices;
        Ok(())
    }

    /// Remove the race selection entirely.
    pub fn clear_race(&mut self) {
        self.race_load_generation += 1;
        self.draft.ledger_mut().revert_if_applied(&SourceKey::Race);
        self.draft.race_id = None;
        self.draft.race_choices = RaceChoices::default();
        self.loaded_race = None;
    }

    /// Revert-then-apply for the race source. On a validation failure the
    /// previous contribution is restored so the draft is left unchanged.
    fn reapply_race(
        &mut self,
        def: &RaceDefinition,
        choices: &RaceChoices,
    ) -> Result<(), DomainError> {
        let previous = self.draft.ledger_mut().revert_if_applied(&SourceKey::Race);
        match contributions::race(def, choices) {
            Ok(contribution) => self.draft.ledger_mut().apply(SourceKey::Race, contribution),
            Err(err) => {
                if let Some(previous) = previous {
                    self.draft.ledger_mut().apply(SourceKey::Race, previous)?;
                }
                Err(err)
            }
        }
    }

    // ──────────────────────────────────────────────────────────────────────
    // Custom lineage
    // ──────────────────────────────────────────────────────────────────────

    /// Set or clear the custom-lineage choice; its bonuses apply and revert
    /// independently of the main race source.
    pub fn set_custom_lineage(&mut self, choice: Option<CustomLineageChoice>) -> Result<()> {
        self.draft
            .ledger_mut()
            .revert_if_applied(&SourceKey::CustomLineage);
        if let Some(choice) = &choice {
            let contribution = contributions::custom_lineage(choice);
            self.draft
                .ledger_mut()
                .apply(SourceKey::CustomLineage, contribution)?;
        }
        self.draft.custom_lineage = choice;
        Ok(())
    }

    // ──────────────────────────────────────────────────────────────────────
    // Background
    // ──────────────────────────────────────────────────────────────────────

    /// Select (or replace) the background.
    #[instrument(skip(self))]
    pub async fn select_background(&mut self, background_id: &str) -> Result<()> {
        self.background_load_generation += 1;
        let generation = self.background_load_generation;

        let def = self
            .backgrounds
            .get_background_details(background_id)
            .await
            .context("Failed to load background from catalog")?
            .ok_or_else(|| anyhow::anyhow!("Background not found: {}", background_id))?;

        self.apply_loaded_background(generation, def)?;
        Ok(())
    }

    fn apply_loaded_background(
        &mut self,
        generation: u64,
        def: BackgroundDefinition,
    ) -> Result<(), DomainError> {
        if generation != self.background_load_generation {
            debug!(background = %def.id, "Discarding stale background load");
            return Ok(());
        }

        let choices = BackgroundChoices::default();
        self.reapply_background(&def, &choices)?;
        info!(background = %def.id, "Background applied");
        self.draft.background_id = Some(def.id.clone());
        self.draft.background_choices = choices;
        self.loaded_background = Some(def);
        Ok(())
    }

    /// Update the user's picks for the selected background's choice slots.
    pub fn update_background_choices(&mut self, choices: BackgroundChoices) -> Result<()> {
        let def = self
            .loaded_background
            .clone()
            .ok_or_else(|| DomainError::validation("no background selected"))?;
        self.reapply_background(&def, &choices)?;
        self.draft.background_choices = choices;
        Ok(())
    }

    pub fn clear_background(&mut self) {
        self.background_load_generation += 1;
        self.draft
            .ledger_mut()
            .revert_if_applied(&SourceKey::Background);
        self.draft.background_id = None;
        self.draft.background_choices = BackgroundChoices::default();
        self.loaded_background = None;
    }

    fn reapply_background(
        &mut self,
        def: &BackgroundDefinition,
        choices: &BackgroundChoices,
    ) -> Result<(), DomainError> {
        let previous = self
            .draft
            .ledger_mut()
            .revert_if_applied(&SourceKey::Background);
        match contributions::background(def, choices) {
            Ok(contribution) => self
                .draft
                .ledger_mut()
                .apply(SourceKey::Background, contribution),
            Err(err) => {
                if let Some(previous) = previous {
                    self.draft
                        .ledger_mut()
                        .apply(SourceKey::Background, previous)?;
                }
                Err(err)
            }
        }
    }

    // ──────────────────────────────────────────────────────────────────────
    // Classes
    // ──────────────────────────────────────────────────────────────────────

    /// Add a class at level 1, returning its entry index.
    #[instrument(skip(self))]
    pub async fn add_class(&mut self, class_name: &str) -> Result<usize> {
        let def = self
            .classes
            .get_class_details(class_name)
            .await
            .context("Failed to load class from catalog")?
            .ok_or_else(|| anyhow::anyhow!("Class not found: {}", class_name))?;

        let index = self.draft.class_entries().len();
        let contribution = contributions::class_entry(index, &def, &[])?;
        let entry = ClassEntry::new(def.id.clone(), def.name.clone(), def.hit_die);
        self.draft.add_class_entry(entry)?;
        self.draft
            .ledger_mut()
            .apply(SourceKey::ClassEntry(index), contribution)?;
        info!(class = %def.id, index, "Class added");
        self.loaded_classes.insert(def.id.clone(), def);

        self.sync_asi_selections().await?;
        Ok(index)
    }

    /// Change one class entry's level. Voids any hit-point roll and re-syncs
    /// ASI features against the new level.
    pub async fn set_class_level(&mut self, index: usize, level: u8) -> Result<()> {
        self.draft.set_class_level(index, level)?;
        self.sync_asi_selections().await?;
        Ok(())
    }

    /// Choose (or re-choose) a class entry's skill proficiencies.
    pub fn choose_class_skills(&mut self, index: usize, skills: Vec<String>) -> Result<()> {
        let class_id = self
            .draft
            .class_entries()
            .get(index)
            .ok_or_else(|| DomainError::invariant(format!("no class entry at index {}", index)))?
            .class_id
            .clone();
        let def = self
            .loaded_classes
            .get(&class_id)
            .cloned()
            .ok_or_else(|| {
                DomainError::invariant(format!("class definition not loaded: {}", class_id))
            })?;

        let key = SourceKey::ClassEntry(index);
        let previous = self.draft.ledger_mut().revert(&key)?;
        match contributions::class_entry(index, &def, &skills) {
            Ok(contribution) => {
                self.draft.ledger_mut().apply(key, contribution)?;
                self.draft.class_entry_mut(index)?.chosen_skills = skills;
                Ok(())
            }
            Err(err) => {
                self.draft.ledger_mut().apply(key, previous)?;
                Err(err.into())
            }
        }
    }

    /// Set a class entry's subclass.
    pub async fn set_subclass(&mut self, index: usize, subclass: Option<String>) -> Result<()> {
        let class_id = self
            .draft
            .class_entries()
            .get(index)
            .ok_or_else(|| DomainError::invariant(format!("no class entry at index {}", index)))?
            .class_id
            .clone();
        if let Some(subclass) = &subclass {
            let def = self.loaded_classes.get(&class_id).ok_or_else(|| {
                DomainError::invariant(format!("class definition not loaded: {}", class_id))
            })?;
            if !def.subclasses.contains(subclass) {
                return Err(DomainError::validation(format!(
                    "{} is not a {} subclass",
                    subclass, def.name
                ))
                .into());
            }
        }
        self.draft.class_entry_mut(index)?.subclass = subclass;
        self.sync_asi_selections().await?;
        Ok(())
    }

    /// Remove the most recently added class and everything it contributed.
    pub async fn remove_last_class(&mut self) -> Result<()> {
        let index = self
            .draft
            .class_entries()
            .len()
            .checked_sub(1)
            .ok_or_else(|| DomainError::validation("no class to remove"))?;
        self.draft
            .ledger_mut()
            .revert(&SourceKey::ClassEntry(index))?;
        self.draft.pop_class_entry();
        self.sync_asi_selections().await?;
        Ok(())
    }

    // ──────────────────────────────────────────────────────────────────────
    // ASI features
    // ──────────────────────────────────────────────────────────────────────

    /// Reconcile ASI selections with the features currently unlocked.
    ///
    /// Newly unlocked features are auto-selected as ability scores with no
    /// picks; selections whose feature dropped below its threshold (or whose
    /// class was removed) are reverted and destroyed.
    async fn sync_asi_selections(&mut self) -> Result<()> {
        let entries: Vec<(String, u8, Option<String>)> = self
            .draft
            .class_entries()
            .iter()
            .map(|e| (e.class_id.clone(), e.level, e.subclass.clone()))
            .collect();

        let mut unlocked: BTreeMap<String, String> = BTreeMap::new();
        for (class_id, level, subclass) in entries {
            let features = self
                .classes
                .list_class_features(&class_id, level, subclass.as_deref(), false)
                .await
                .context("Failed to load class features from catalog")?;
            for feature in features
                .iter()
                .filter(|f| f.is_ability_score_improvement())
            {
                unlocked.insert(feature.id.clone(), feature.name.clone());
            }
        }

        let stale: Vec<String> = self
            .draft
            .asi_selections
            .keys()
            .filter(|id| !unlocked.contains_key(*id))
            .cloned()
            .collect();
        for feature_id in stale {
            let key = SourceKey::AsiFeature(feature_id.clone());
            self.draft.ledger_mut().revert(&key)?;
            self.draft.asi_selections.remove(&feature_id);
            debug!(feature = %feature_id, "ASI selection destroyed; feature no longer unlocked");
        }

        for (feature_id, feature_name) in unlocked {
            if !self.draft.asi_selections.contains_key(&feature_id) {
                let selection = AsiSelection::new(&feature_id, &feature_name);
                self.draft
                    .ledger_mut()
                    .apply(selection.source_key(), selection.contribution())?;
                debug!(feature = %feature_id, "ASI feature auto-selected");
                self.draft.asi_selections.insert(feature_id, selection);
            }
        }
        Ok(())
    }

    /// Set the ability picks of an ASI selection (switching it away from a
    /// feat if necessary).
    pub fn set_asi_ability_picks(
        &mut self,
        feature_id: &str,
        first: Option<Ability>,
        second: Option<Ability>,
    ) -> Result<()> {
        let selection = self.draft.asi_selections.get(feature_id).ok_or_else(|| {
            DomainError::validation(format!("no ASI feature selected with id {}", feature_id))
        })?;
        let mut updated = selection.clone();
        updated.set_ability_picks(first, second)?;
        self.swap_asi_selection(updated)
    }

    /// Switch an ASI selection to a feat. Exactly the ability bonuses the
    /// previous choice contributed are reverted.
    pub fn set_asi_feat(&mut self, feature_id: &str, feat: FeatDefinition) -> Result<()> {
        let selection = self.draft.asi_selections.get(feature_id).ok_or_else(|| {
            DomainError::validation(format!("no ASI feature selected with id {}", feature_id))
        })?;
        let mut updated = selection.clone();
        updated.choose_feat(feat);
        self.swap_asi_selection(updated)
    }

    fn swap_asi_selection(&mut self, updated: AsiSelection) -> Result<()> {
        let key = updated.source_key();
        let previous = self.draft.ledger_mut().revert(&key)?;
        match self
            .draft
            .ledger_mut()
            .apply(key.clone(), updated.contribution())
        {
            Ok(()) => {
                self.draft
                    .asi_selections
                    .insert(updated.feature_id().to_string(), updated);
                Ok(())
            }
            Err(err) => {
                error!(source = %key, error = %err, "ASI swap failed; restoring previous choice");
                self.draft.ledger_mut().apply(key, previous)?;
                Err(err.into())
            }
        }
    }

    // ──────────────────────────────────────────────────────────────────────
    // Point buy and hit points
    // ──────────────────────────────────────────────────────────────────────

    /// Direct point-buy edit of one base ability score.
    pub fn try_set_base_score(&mut self, ability: Ability, value: i32) -> Result<()> {
        self.draft.try_set_base_score(ability, value)?;
        Ok(())
    }

    /// Roll hit points for the current classes. Permitted only once per
    /// session and only with the point-buy budget spent exactly.
    #[instrument(skip(self))]
    pub fn roll_hit_points(&mut self) -> Result<HitPointTotal> {
        if self.draft.class_entries().is_empty() {
            return Err(DomainError::validation("add a class before rolling hit points").into());
        }
        if !self.draft.is_point_buy_complete() {
            return Err(DomainError::validation(format!(
                "point buy must spend exactly {} points ({} spent)",
                point_buy::POINT_BUDGET,
                self.draft.points_spent()
            ))
            .into());
        }

        let roll = HitPointRoll::roll(self.draft.class_entries(), &mut rand::thread_rng());
        self.draft.set_hit_points(roll)?;
        self.hit_point_total()
            .ok_or_else(|| DomainError::invariant("hit points missing after roll").into())
    }

    /// The current hit-point total: stored raw dice with the present
    /// Constitution modifier and race bonus re-applied.
    pub fn hit_point_total(&self) -> Option<HitPointTotal> {
        self.draft.hit_points().map(|roll| {
            roll.recompute(
                self.draft.constitution_modifier(),
                self.draft.ledger().hp_per_level_total(),
                self.draft.total_level(),
            )
        })
    }

    /// The draft's merged proficiency state.
    pub fn proficiencies(&self) -> ProficiencySets {
        proficiency::aggregate(
            self.draft.ledger(),
            self.draft.class_entries(),
            &self.loaded_classes,
        )
    }

    // ──────────────────────────────────────────────────────────────────────
    // Wizard steps
    // ──────────────────────────────────────────────────────────────────────

    /// Whether one step's required choices are complete.
    pub fn validate_step(&self, step: WizardStep) -> Result<(), DomainError> {
        match step {
            WizardStep::Race => {
                let def = self
                    .loaded_race
                    .as_ref()
                    .ok_or_else(|| DomainError::validation("no main race selected"))?;
                contributions::validate_race_complete(def, &self.draft.race_choices)
            }
            WizardStep::Class => {
                if self.draft.class_entries().is_empty() {
                    return Err(DomainError::validation("at least one class is required"));
                }
                for entry in self.draft.class_entries() {
                    let def = self.loaded_classes.get(&entry.class_id).ok_or_else(|| {
                        DomainError::invariant(format!(
                            "class definition not loaded: {}",
                            entry.class_id
                        ))
                    })?;
                    if entry.chosen_skills.len() != def.skill_choices.count as usize {
                        return Err(DomainError::validation(format!(
                            "{} requires {} skill choices, {} chosen",
                            entry.name,
                            def.skill_choices.count,
                            entry.chosen_skills.len()
                        )));
                    }
                    if entry.level >= def.subclass_selection_level && entry.subclass.is_none() {
                        return Err(DomainError::validation(format!(
                            "{} requires a subclass at level {}",
                            entry.name, def.subclass_selection_level
                        )));
                    }
                }
                for selection in self.draft.asi_selections.values() {
                    if !selection.is_complete() {
                        return Err(DomainError::validation(format!(
                            "{} has an incomplete choice",
                            selection.feature_name()
                        )));
                    }
                }
                Ok(())
            }
            WizardStep::Background => {
                let def = self
                    .loaded_background
                    .as_ref()
                    .ok_or_else(|| DomainError::validation("no background selected"))?;
                contributions::validate_background_complete(def, &self.draft.background_choices)
            }
            WizardStep::Abilities => {
                if !self.draft.is_point_buy_complete() {
                    return Err(DomainError::validation(format!(
                        "point buy must spend exactly {} points ({} spent)",
                        point_buy::POINT_BUDGET,
                        self.draft.points_spent()
                    )));
                }
                Ok(())
            }
            WizardStep::HitPoints => {
                if self.draft.hit_points().is_none() {
                    return Err(DomainError::validation("hit points have not been rolled"));
                }
                Ok(())
            }
            WizardStep::Review => Ok(()),
        }
    }

    /// Advance to the next step; refused while the current step is
    /// incomplete. The draft is never mutated by a refused advance.
    pub fn advance_step(&mut self) -> Result<WizardStep, DomainError> {
        self.validate_step(self.step)?;
        match self.step.next() {
            Some(next) => {
                self.step = next;
                Ok(next)
            }
            None => Err(DomainError::invalid_state_transition(
                "already at the final step",
            )),
        }
    }

    /// Step backwards; always allowed.
    pub fn back_step(&mut self) -> Option<WizardStep> {
        let previous = self.step.previous()?;
        self.step = previous;
        Some(previous)
    }

    // ──────────────────────────────────────────────────────────────────────
    // Finalize
    // ──────────────────────────────────────────────────────────────────────

    /// All-or-nothing finalization: every validation must pass, then exactly
    /// one immutable creation record is emitted. On failure nothing is
    /// emitted and the draft stays open for correction.
    #[instrument(skip(self))]
    pub fn finalize(&self) -> Result<CharacterCreationRecord> {
        if self.draft.name.trim().is_empty() {
            return Err(DomainError::validation("character name is required").into());
        }
        for step in WizardStep::ALL {
            self.validate_step(step)?;
        }

        let abilities = self.draft.resolved_abilities();
        for (ability, score) in abilities.iter() {
            if score < 0 {
                let err = DomainError::invariant(format!(
                    "resolved {} is negative ({})",
                    ability, score
                ));
                error!(error = %err, "Aborting finalize");
                return Err(err.into());
            }
        }
        if self.draft.total_level() > MAX_TOTAL_LEVEL {
            let err = DomainError::invariant(format!(
                "total level {} exceeds {}",
                self.draft.total_level(),
                MAX_TOTAL_LEVEL
            ));
            error!(error = %err, "Aborting finalize");
            return Err(err.into());
        }

        let race = self
            .loaded_race
            .as_ref()
            .ok_or_else(|| DomainError::invariant("race definition missing after validation"))?;
        let background = self.loaded_background.as_ref().ok_or_else(|| {
            DomainError::invariant("background definition missing after validation")
        })?;
        let hit_points = self
            .hit_point_total()
            .ok_or_else(|| DomainError::invariant("hit points missing after validation"))?;

        let sets = self.proficiencies();
        let dex_modifier = abilities.modifier_of(Ability::Dexterity);

        let record = CharacterCreationRecord {
            name: self.draft.name.trim().to_string(),
            classes: self
                .draft
                .class_entries()
                .iter()
                .map(|e| ResolvedClass {
                    class_id: e.class_id.clone(),
                    name: e.name.clone(),
                    level: e.level,
                    subclass: e.subclass.clone(),
                })
                .collect(),
            race_ids: vec![race.id.clone()],
            main_race_id: race.id.clone(),
            background_id: background.id.clone(),
            ability_scores: abilities,
            skills: sets.skills,
            saving_throws: sets.saving_throws.into_iter().collect(),
            tools: sets.tools.into_iter().collect(),
            equipment_proficiencies: sets.equipment.into_iter().collect(),
            languages: sets.languages.into_iter().collect(),
            max_hit_points: hit_points.total,
            current_hit_points: hit_points.total,
            speed: self.draft.speed(),
            armor_class: herodraft_domain::record::unarmored_armor_class(dex_modifier),
            initiative: herodraft_domain::record::initiative(dex_modifier),
            feats: self.draft.ledger().granted_feats().cloned().collect(),
            starting_money_gp: background.money.gold,
            starting_equipment: background.equipment.clone(),
            created_at: self.draft.created_at,
        };
        info!(name = %record.name, level = self.draft.total_level(), "Creation record emitted");
        Ok(record)
    }
}
