//! Per-source contribution computation.
//!
//! Pure functions of a normalized definition plus the user's picks: computing
//! twice with unchanged inputs yields the same set, which is what makes the
//! ledger's apply idempotent. Overlap with other sources (a race skill the
//! class already grants) is still recorded here; the proficiency aggregator
//! owns the merge priority.

use crate::abilities::Ability;
use crate::catalog::{
    BackgroundDefinition, ClassDefinition, ProficiencyGrant, RaceDefinition,
};
use crate::error::DomainError;
use crate::resolvers::ability::{validate_ability_picks, validate_partial_ability_picks};
use crate::skills::ProficiencyLevel;
use crate::value_objects::bonus::{BonusKind, ContributionSet};
use crate::value_objects::source::SourceKey;

/// User picks accompanying a race selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceChoices {
    /// Picks for the race's ability-increase choice slots.
    pub ability_picks: Vec<Ability>,
    /// Picks for the race's skill choice, if it has one.
    pub skill_picks: Vec<String>,
    /// Languages chosen where the race grants open language slots.
    pub language_picks: Vec<String>,
}

/// User picks accompanying a background selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundChoices {
    pub skill_picks: Vec<String>,
    pub tool_picks: Vec<String>,
    pub language_picks: Vec<String>,
}

/// Compute the contribution of a race selection.
///
/// Picks may still be in progress: partially picked choices contribute only
/// what has been picked so far. Completeness gates step advance and
/// finalization, not apply.
pub fn race(def: &RaceDefinition, choices: &RaceChoices) -> Result<ContributionSet, DomainError> {
    let mut set = ContributionSet::for_source(SourceKey::Race);

    for (ability, amount) in def.ability_increase.fixed_bonuses() {
        set.push(BonusKind::AbilityScore { ability, amount });
    }
    if let Some(choice) = def.ability_increase.choice() {
        validate_partial_ability_picks(choice, &choices.ability_picks)?;
        for ability in &choices.ability_picks {
            set.push(BonusKind::AbilityScore {
                ability: *ability,
                amount: 1,
            });
        }
    } else if !choices.ability_picks.is_empty() {
        return Err(DomainError::validation(format!(
            "{} has no ability choice to pick for",
            def.name
        )));
    }

    set.push(BonusKind::Speed { feet: def.speed });

    for skill in grant_skills(&def.skills, &choices.skill_picks, "skill")? {
        set.push(BonusKind::SkillProficiency {
            skill,
            level: ProficiencyLevel::Proficient,
        });
    }

    for tool in &def.tools {
        set.push(BonusKind::ToolProficiency { tool: tool.clone() });
    }

    for category in &def.weapon_training {
        set.push(BonusKind::EquipmentProficiency {
            category: *category,
        });
    }

    validate_language_picks(
        def.languages.choose_any,
        &choices.language_picks,
        &def.name,
    )?;
    for language in def.languages.fixed.iter().chain(&choices.language_picks) {
        set.push(BonusKind::Language {
            language: language.clone(),
        });
    }

    if def.hp_bonus_per_level != 0 {
        set.push(BonusKind::HitPointsPerLevel {
            amount: def.hp_bonus_per_level,
        });
    }

    Ok(set)
}

/// Compute the contribution of a background selection.
pub fn background(
    def: &BackgroundDefinition,
    choices: &BackgroundChoices,
) -> Result<ContributionSet, DomainError> {
    let mut set = ContributionSet::for_source(SourceKey::Background);

    for skill in grant_skills(&def.skills, &choices.skill_picks, "skill")? {
        set.push(BonusKind::SkillProficiency {
            skill,
            level: ProficiencyLevel::Proficient,
        });
    }

    for tool in grant_skills(&def.tools, &choices.tool_picks, "tool")? {
        set.push(BonusKind::ToolProficiency { tool });
    }

    validate_language_picks(
        def.languages.choose_any,
        &choices.language_picks,
        &def.name,
    )?;
    for language in def.languages.fixed.iter().chain(&choices.language_picks) {
        set.push(BonusKind::Language {
            language: language.clone(),
        });
    }

    Ok(set)
}

/// Compute the contribution of one class entry.
///
/// Only skill proficiencies are ledger-tracked for classes; equipment and
/// saving throws depend on the set of classes and are re-derived by the
/// proficiency aggregator on every merge.
pub fn class_entry(
    index: usize,
    def: &ClassDefinition,
    chosen_skills: &[String],
) -> Result<ContributionSet, DomainError> {
    if chosen_skills.len() > def.skill_choices.count as usize {
        return Err(DomainError::validation(format!(
            "{} allows {} skill choices, got {}",
            def.name,
            def.skill_choices.count,
            chosen_skills.len()
        )));
    }
    for (position, skill) in chosen_skills.iter().enumerate() {
        if !def.skill_choices.pool.contains(skill) {
            return Err(DomainError::validation(format!(
                "{} is not in the {} skill list",
                skill, def.name
            )));
        }
        if chosen_skills[..position].contains(skill) {
            return Err(DomainError::validation(format!(
                "{} chosen more than once",
                skill
            )));
        }
    }

    let mut set = ContributionSet::for_source(SourceKey::ClassEntry(index));
    for skill in chosen_skills {
        set.push(BonusKind::SkillProficiency {
            skill: skill.clone(),
            level: ProficiencyLevel::Proficient,
        });
    }
    Ok(set)
}

/// Check that every choice a race selection requires has been made.
/// Gates step advance and finalization; apply accepts partial picks.
pub fn validate_race_complete(
    def: &RaceDefinition,
    choices: &RaceChoices,
) -> Result<(), DomainError> {
    if let Some(choice) = def.ability_increase.choice() {
        validate_ability_picks(choice, &choices.ability_picks)?;
    }
    validate_grant_complete(&def.skills, &choices.skill_picks, "skill", &def.name)?;
    if choices.language_picks.len() != def.languages.choose_any as usize {
        return Err(DomainError::validation(format!(
            "{} requires {} language picks, got {}",
            def.name,
            def.languages.choose_any,
            choices.language_picks.len()
        )));
    }
    Ok(())
}

/// Check that every choice a background selection requires has been made.
pub fn validate_background_complete(
    def: &BackgroundDefinition,
    choices: &BackgroundChoices,
) -> Result<(), DomainError> {
    validate_grant_complete(&def.skills, &choices.skill_picks, "skill", &def.name)?;
    validate_grant_complete(&def.tools, &choices.tool_picks, "tool", &def.name)?;
    if choices.language_picks.len() != def.languages.choose_any as usize {
        return Err(DomainError::validation(format!(
            "{} requires {} language picks, got {}",
            def.name,
            def.languages.choose_any,
            choices.language_picks.len()
        )));
    }
    Ok(())
}

fn validate_grant_complete(
    grant: &ProficiencyGrant,
    picks: &[String],
    kind: &str,
    source_name: &str,
) -> Result<(), DomainError> {
    let required = grant.picks_required() as usize;
    if picks.len() != required {
        return Err(DomainError::validation(format!(
            "{} requires {} {} picks, got {}",
            source_name,
            required,
            kind,
            picks.len()
        )));
    }
    Ok(())
}

/// Compute the contribution of a custom-lineage choice.
///
/// Applied alongside the race source: a +2 ability of the user's choosing,
/// an optional skill proficiency, and an optional feat.
pub fn custom_lineage(choice: &crate::entities::draft::CustomLineageChoice) -> ContributionSet {
    let mut set = ContributionSet::for_source(SourceKey::CustomLineage);
    set.push(BonusKind::AbilityScore {
        ability: choice.ability,
        amount: 2,
    });
    if let Some(skill) = &choice.skill {
        set.push(BonusKind::SkillProficiency {
            skill: skill.clone(),
            level: ProficiencyLevel::Proficient,
        });
    }
    if let Some(feat) = &choice.feat {
        set.push(BonusKind::GrantedFeat { feat: feat.clone() });
    }
    set
}

fn grant_skills(
    grant: &ProficiencyGrant,
    picks: &[String],
    kind: &str,
) -> Result<Vec<String>, DomainError> {
    let mut granted = grant.fixed.clone();
    match &grant.choose {
        Some(choice) => {
            if picks.len() > choice.count as usize {
                return Err(DomainError::validation(format!(
                    "at most {} {} picks allowed, got {}",
                    choice.count,
                    kind,
                    picks.len()
                )));
            }
            for (position, pick) in picks.iter().enumerate() {
                if !choice.pool.contains(pick) {
                    return Err(DomainError::validation(format!(
                        "{} is not an allowed {} pick",
                        pick, kind
                    )));
                }
                if picks[..position].contains(pick) {
                    return Err(DomainError::validation(format!(
                        "{} picked more than once",
                        pick
                    )));
                }
                granted.push(pick.clone());
            }
        }
        None => {
            if !picks.is_empty() {
                return Err(DomainError::validation(format!(
                    "no {} choice available for these picks",
                    kind
                )));
            }
        }
    }
    Ok(granted)
}

fn validate_language_picks(
    choose_any: u8,
    picks: &[String],
    source_name: &str,
) -> Result<(), DomainError> {
    if picks.len() > choose_any as usize {
        return Err(DomainError::validation(format!(
            "{} grants {} language picks, got {}",
            source_name,
            choose_any,
            picks.len()
        )));
    }
    for (position, pick) in picks.iter().enumerate() {
        if picks[..position].contains(pick) {
            return Err(DomainError::validation(format!(
                "{} picked more than once",
                pick
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        AbilityChoice, AbilityIncrease, GrantChoice, LanguageGrant, SkillChoice,
    };
    use crate::value_objects::dice::HitDie;

    fn human() -> RaceDefinition {
        let mut def = RaceDefinition::new(
            "human",
            "Human",
            30,
            AbilityIncrease::FixedMulti { amount: 1 },
        );
        def.languages = LanguageGrant {
            fixed: vec!["Common".into()],
            choose_any: 1,
        };
        def
    }

    fn half_elf() -> RaceDefinition {
        RaceDefinition::new(
            "half-elf",
            "Half-Elf",
            30,
            AbilityIncrease::Custom {
                fixed: vec![(Ability::Charisma, 2)],
                choice: AbilityChoice::new(
                    2,
                    vec![
                        Ability::Strength,
                        Ability::Dexterity,
                        Ability::Constitution,
                        Ability::Intelligence,
                        Ability::Wisdom,
                    ],
                ),
            },
        )
    }

    #[test]
    fn human_contributes_one_to_every_ability() {
        let choices = RaceChoices {
            language_picks: vec!["Elvish".into()],
            ..RaceChoices::default()
        };
        let set = race(&human(), &choices).unwrap();
        for ability in Ability::ALL {
            assert_eq!(set.ability_bonus(ability), 1);
        }
        assert_eq!(set.speed(), Some(30));
    }

    #[test]
    fn half_elf_fixed_plus_picks() {
        let choices = RaceChoices {
            ability_picks: vec![Ability::Strength, Ability::Dexterity],
            ..RaceChoices::default()
        };
        let set = race(&half_elf(), &choices).unwrap();
        assert_eq!(set.ability_bonus(Ability::Charisma), 2);
        assert_eq!(set.ability_bonus(Ability::Strength), 1);
        assert_eq!(set.ability_bonus(Ability::Dexterity), 1);
        assert_eq!(set.ability_bonus(Ability::Constitution), 0);
    }

    #[test]
    fn partial_ability_picks_contribute_what_was_picked() {
        let choices = RaceChoices {
            ability_picks: vec![Ability::Strength],
            ..RaceChoices::default()
        };
        let set = race(&half_elf(), &choices).unwrap();
        assert_eq!(set.ability_bonus(Ability::Strength), 1);
        assert_eq!(set.ability_bonus(Ability::Charisma), 2);

        // Incomplete picks block completion, not apply.
        let err = validate_race_complete(&half_elf(), &choices).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn excess_ability_picks_rejected() {
        let choices = RaceChoices {
            ability_picks: vec![Ability::Strength, Ability::Dexterity, Ability::Wisdom],
            ..RaceChoices::default()
        };
        let err = race(&half_elf(), &choices).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn picks_without_choice_slot_rejected() {
        let choices = RaceChoices {
            ability_picks: vec![Ability::Strength],
            language_picks: vec!["Elvish".into()],
            ..RaceChoices::default()
        };
        let err = race(&human(), &choices).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn background_choice_picks_validated_against_pool() {
        let def = BackgroundDefinition::new("sage", "Sage")
            .with_skills(ProficiencyGrant::fixed_only(vec![
                "Arcana".into(),
                "History".into(),
            ]))
            .with_tools(ProficiencyGrant {
                fixed: vec![],
                choose: Some(GrantChoice::new(1, vec!["Calligrapher's supplies".into()])),
            })
            .with_languages(LanguageGrant {
                fixed: vec![],
                choose_any: 2,
            });

        let ok = background(
            &def,
            &BackgroundChoices {
                tool_picks: vec!["Calligrapher's supplies".into()],
                language_picks: vec!["Draconic".into(), "Celestial".into()],
                ..BackgroundChoices::default()
            },
        )
        .unwrap();
        let skills: Vec<_> = ok.skills().map(|(s, _)| s.to_string()).collect();
        assert_eq!(skills, vec!["Arcana", "History"]);

        let err = background(
            &def,
            &BackgroundChoices {
                tool_picks: vec!["Smith's tools".into()],
                language_picks: vec!["Draconic".into(), "Celestial".into()],
                ..BackgroundChoices::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn class_entry_requires_exact_skill_count() {
        let def = ClassDefinition {
            id: "fighter".into(),
            name: "Fighter".into(),
            hit_die: HitDie::D10,
            skill_choices: SkillChoice::new(
                2,
                vec!["Athletics".into(), "Intimidation".into(), "Survival".into()],
            ),
            saving_throws: vec![Ability::Strength, Ability::Constitution],
            armor_proficiencies: vec![],
            weapon_proficiencies: vec![],
            multiclass_proficiencies: vec![],
            subclass_selection_level: 3,
            subclasses: vec![],
        };

        let ok = class_entry(0, &def, &["Athletics".into(), "Survival".into()]).unwrap();
        assert_eq!(ok.source(), &SourceKey::ClassEntry(0));
        assert_eq!(ok.len(), 2);

        // A single pick is a partial, applyable state.
        let partial = class_entry(0, &def, &["Athletics".into()]).unwrap();
        assert_eq!(partial.len(), 1);

        let too_many = class_entry(
            0,
            &def,
            &[
                "Athletics".into(),
                "Survival".into(),
                "Intimidation".into(),
            ],
        )
        .unwrap_err();
        assert!(matches!(too_many, DomainError::Validation(_)));

        let duplicate =
            class_entry(0, &def, &["Athletics".into(), "Athletics".into()]).unwrap_err();
        assert!(matches!(duplicate, DomainError::Validation(_)));

        let outside = class_entry(0, &def, &["Athletics".into(), "Arcana".into()]).unwrap_err();
        assert!(matches!(outside, DomainError::Validation(_)));
    }

    #[test]
    fn recomputing_with_same_inputs_is_identical_apart_from_ids() {
        let choices = RaceChoices {
            ability_picks: vec![Ability::Strength, Ability::Dexterity],
            ..RaceChoices::default()
        };
        let first = race(&half_elf(), &choices).unwrap();
        let second = race(&half_elf(), &choices).unwrap();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.bonuses().iter().zip(second.bonuses()) {
            assert_eq!(a.kind(), b.kind());
        }
    }
}
