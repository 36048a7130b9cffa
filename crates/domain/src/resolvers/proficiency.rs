//! Proficiency aggregation across all active sources.
//!
//! One merge policy, evaluated per skill/tool/language:
//! 1. A class-granted skill is proficient and survives race/background
//!    changes; only an explicit expertise grant upgrades it.
//! 2. Otherwise the most recently applied non-class source wins.
//!
//! Equipment proficiency is a boolean OR. The class side of it is re-derived
//! fresh from the set of classes on every aggregation (first class gets full
//! grants, later classes the multiclass subset) because it depends on the
//! class set as a whole rather than on any single revertible entry.

use std::collections::{BTreeMap, BTreeSet};

use crate::abilities::Ability;
use crate::catalog::ClassDefinition;
use crate::entities::draft::ClassEntry;
use crate::ledger::ModifierLedger;
use crate::skills::{EquipmentCategory, ProficiencyLevel};

/// The merged proficiency state of a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProficiencySets {
    pub skills: BTreeMap<String, ProficiencyLevel>,
    pub tools: BTreeSet<String>,
    pub languages: BTreeSet<String>,
    pub equipment: BTreeSet<EquipmentCategory>,
    pub saving_throws: BTreeSet<Ability>,
}

/// Merge every active source into final proficiency sets.
///
/// `class_defs` must align with `class_entries` (definition for the entry's
/// class id); entries whose definition is missing contribute no equipment.
pub fn aggregate(
    ledger: &ModifierLedger,
    class_entries: &[ClassEntry],
    class_defs: &BTreeMap<String, ClassDefinition>,
) -> ProficiencySets {
    let mut sets = ProficiencySets::default();

    // Skills: class grants first (priority), then most-recent-wins among the
    // rest, upgrades only.
    let mut class_granted: BTreeMap<String, ProficiencyLevel> = BTreeMap::new();
    let mut other_granted: BTreeMap<String, (u64, ProficiencyLevel)> = BTreeMap::new();
    for grant in ledger.skill_grants() {
        if grant.source.is_class() {
            let entry = class_granted
                .entry(grant.skill.to_string())
                .or_insert(ProficiencyLevel::None);
            if grant.level.rank() > entry.rank() {
                *entry = grant.level;
            }
        } else {
            let entry = other_granted
                .entry(grant.skill.to_string())
                .or_insert((grant.seq, grant.level));
            if grant.seq >= entry.0 {
                *entry = (grant.seq, grant.level);
            }
        }
    }
    for (skill, level) in &class_granted {
        sets.skills.insert(skill.clone(), *level);
    }
    for (skill, (_, level)) in other_granted {
        let merged = sets.skills.entry(skill).or_insert(ProficiencyLevel::None);
        if level.rank() > merged.rank() {
            *merged = level;
        }
    }

    for tool in ledger.tool_grants() {
        sets.tools.insert(tool.to_string());
    }
    for language in ledger.language_grants() {
        sets.languages.insert(language.to_string());
    }

    // Equipment: ledger-tracked grants from non-class sources...
    for category in ledger.equipment_grants() {
        sets.equipment.insert(category);
    }
    // ...OR'd with the class side, recomputed from the class set.
    for (index, entry) in class_entries.iter().enumerate() {
        if let Some(def) = class_defs.get(&entry.class_id) {
            for category in def.equipment_grants(index == 0) {
                sets.equipment.insert(category);
            }
        }
    }

    // Saving throws come from the first class taken.
    if let Some(first) = class_entries.first() {
        if let Some(def) = class_defs.get(&first.class_id) {
            sets.saving_throws.extend(def.saving_throws.iter().copied());
        }
    }

    sets
}
