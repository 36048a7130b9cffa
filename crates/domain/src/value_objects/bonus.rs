//! Attributed bonuses - the ledger's unit of account.
//!
//! Every numeric or flag change a source makes to the draft is recorded as an
//! `AttributedBonus` so the exact set can be subtracted again on revert.

use serde::{Deserialize, Serialize};

use crate::abilities::Ability;
use crate::catalog::FeatDefinition;
use crate::ids::BonusId;
use crate::skills::{EquipmentCategory, ProficiencyLevel};
use crate::value_objects::source::SourceKey;

/// What a single attributed bonus changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum BonusKind {
    /// Additive ability-score bonus.
    AbilityScore { ability: Ability, amount: i32 },
    /// Skill proficiency at a given level.
    SkillProficiency {
        skill: String,
        level: ProficiencyLevel,
    },
    /// Proficiency with a named tool.
    ToolProficiency { tool: String },
    /// Proficiency with an equipment category.
    EquipmentProficiency { category: EquipmentCategory },
    /// A known language.
    Language { language: String },
    /// Walking speed in feet, set by the source (not additive).
    Speed { feet: u32 },
    /// Flat hit points per character level (applied once across all classes).
    HitPointsPerLevel { amount: i32 },
    /// A feat granted by the source.
    GrantedFeat { feat: FeatDefinition },
}

/// A single recorded change, attributable to exactly one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributedBonus {
    id: BonusId,
    source: SourceKey,
    kind: BonusKind,
}

impl AttributedBonus {
    pub fn new(source: SourceKey, kind: BonusKind) -> Self {
        Self {
            id: BonusId::new(),
            source,
            kind,
        }
    }

    pub fn id(&self) -> BonusId {
        self.id
    }

    pub fn source(&self) -> &SourceKey {
        &self.source
    }

    pub fn kind(&self) -> &BonusKind {
        &self.kind
    }
}

/// The full set of bonuses one source contributed in a single apply.
///
/// Immutable once computed: revert subtracts exactly this set, never a
/// recomputation from the source's current definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionSet {
    source: SourceKey,
    bonuses: Vec<AttributedBonus>,
}

impl ContributionSet {
    /// Start an empty contribution for a source.
    pub fn for_source(source: SourceKey) -> Self {
        Self {
            source,
            bonuses: Vec::new(),
        }
    }

    /// Record one bonus, attributed to this set's source.
    pub fn push(&mut self, kind: BonusKind) {
        self.bonuses
            .push(AttributedBonus::new(self.source.clone(), kind));
    }

    pub fn source(&self) -> &SourceKey {
        &self.source
    }

    pub fn bonuses(&self) -> &[AttributedBonus] {
        &self.bonuses
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bonuses.len()
    }

    /// Total ability bonus this set contributes to one ability.
    pub fn ability_bonus(&self, ability: Ability) -> i32 {
        self.bonuses
            .iter()
            .filter_map(|b| match b.kind() {
                BonusKind::AbilityScore { ability: a, amount } if *a == ability => Some(*amount),
                _ => None,
            })
            .sum()
    }

    /// Skill proficiencies granted by this set.
    pub fn skills(&self) -> impl Iterator<Item = (&str, ProficiencyLevel)> + '_ {
        self.bonuses.iter().filter_map(|b| match b.kind() {
            BonusKind::SkillProficiency { skill, level } => Some((skill.as_str(), *level)),
            _ => None,
        })
    }

    /// Speed value set by this set, if any.
    pub fn speed(&self) -> Option<u32> {
        self.bonuses.iter().find_map(|b| match b.kind() {
            BonusKind::Speed { feet } => Some(*feet),
            _ => None,
        })
    }

    /// Feats granted by this set.
    pub fn feats(&self) -> impl Iterator<Item = &FeatDefinition> + '_ {
        self.bonuses.iter().filter_map(|b| match b.kind() {
            BonusKind::GrantedFeat { feat } => Some(feat),
            _ => None,
        })
    }
}
