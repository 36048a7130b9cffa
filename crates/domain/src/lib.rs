extern crate self as herodraft_domain;

pub mod abilities;
pub mod asi;
pub mod catalog;
pub mod contributions;
pub mod entities;
pub mod error;
pub mod hit_points;
pub mod ids;
pub mod ledger;
pub mod point_buy;
pub mod record;
pub mod resolvers;
pub mod skills;
pub mod value_objects;

pub use abilities::{Ability, AbilityScores};
pub use asi::{unlocked_asi_levels, AsiChoice, AsiSelection};
pub use catalog::{
    AbilityChoice, AbilityIncrease, BackgroundDefinition, BackgroundSummary, ClassDefinition,
    ClassFeature, ClassSummary, FeatDefinition, FlavorTable, GrantChoice, LanguageGrant,
    ProficiencyGrant, RaceDefinition, RaceSummary, RacialTrait, RawAbilityIncrease, SkillChoice,
    StartingMoney, ASI_LEVELS, CHOICE_PER_ABILITY_CAP,
};
pub use contributions::{BackgroundChoices, RaceChoices};
pub use entities::{
    CharacterDraft, ClassEntry, CustomLineageChoice, DEFAULT_SPEED, MAX_TOTAL_LEVEL,
};
pub use error::DomainError;
pub use hit_points::{ClassHitRoll, ClassSubtotal, HitPointRoll, HitPointTotal};
pub use ids::{BonusId, DraftId};
pub use ledger::{LedgerEntry, ModifierLedger, SkillGrantRef};
pub use record::{CharacterCreationRecord, ResolvedClass};
pub use resolvers::{ChoiceTracker, ProficiencySets};
pub use skills::{
    is_known_skill, skill_ability, EquipmentCategory, ProficiencyLevel, SKILL_NAMES,
};
pub use value_objects::{
    AttributedBonus, BonusKind, ContributionSet, DiceParseError, HitDie, SourceKey,
};
