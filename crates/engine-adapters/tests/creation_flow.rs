//! Full creation flows driven through the in-memory catalogs.

use std::sync::Arc;

use herodraft_domain::contributions::{BackgroundChoices, RaceChoices};
use herodraft_domain::{Ability, ProficiencyLevel};
use herodraft_engine_adapters::{
    InMemoryBackgroundCatalog, InMemoryClassCatalog, InMemoryRaceCatalog,
};
use herodraft_engine_app::{CharacterCreationService, WizardStep};

fn open_session() -> CharacterCreationService {
    CharacterCreationService::new(
        Arc::new(InMemoryRaceCatalog::with_reference_data()),
        Arc::new(InMemoryClassCatalog::with_reference_data()),
        Arc::new(InMemoryBackgroundCatalog::with_reference_data()),
    )
}

#[tokio::test]
async fn human_soldier_fighter_start_to_finish() {
    let mut session = open_session();
    session.set_name("Brenn Ironside");

    session.select_race("human").await.expect("select race");
    session
        .update_race_choices(RaceChoices {
            language_picks: vec!["Dwarvish".into()],
            ..RaceChoices::default()
        })
        .expect("language pick");
    session.advance_step().expect("race complete");

    let fighter = session.add_class("fighter").await.expect("add class");
    session
        .choose_class_skills(fighter, vec!["Athletics".into(), "Perception".into()])
        .expect("class skills");
    session.advance_step().expect("class complete");

    session
        .select_background("soldier")
        .await
        .expect("background");
    session
        .update_background_choices(BackgroundChoices {
            tool_picks: vec!["Vehicles (land)".into()],
            ..BackgroundChoices::default()
        })
        .expect("tool pick");
    session.advance_step().expect("background complete");

    session
        .try_set_base_score(Ability::Strength, 15)
        .expect("STR");
    session
        .try_set_base_score(Ability::Constitution, 15)
        .expect("CON");
    session
        .try_set_base_score(Ability::Dexterity, 14)
        .expect("DEX");
    session
        .try_set_base_score(Ability::Wisdom, 10)
        .expect("WIS");
    // 9 + 9 + 7 + 2 = 27: the budget is spent exactly.
    assert!(session.draft().is_point_buy_complete());
    session.advance_step().expect("abilities complete");

    let hp = session.roll_hit_points().expect("roll");
    // Level 1 fighter: d10 max + CON modifier (16 -> +3).
    assert_eq!(hp.total, 13);
    session.advance_step().expect("hit points complete");
    assert_eq!(session.step(), WizardStep::Review);

    let record = session.finalize().expect("finalize");
    assert_eq!(record.name, "Brenn Ironside");
    assert_eq!(record.ability_scores.get(Ability::Strength), 16);
    assert_eq!(record.max_hit_points, 13);
    assert_eq!(record.speed, 30);
    assert!(record.languages.contains(&"Dwarvish".to_string()));
    assert!(record.tools.contains(&"Vehicles (land)".to_string()));
    assert_eq!(
        record.skills.get("Athletics"),
        Some(&ProficiencyLevel::Proficient)
    );
    assert_eq!(
        record.skills.get("Intimidation"),
        Some(&ProficiencyLevel::Proficient)
    );
}

#[tokio::test]
async fn race_replacement_mid_flow_keeps_derived_state_consistent() {
    let mut session = open_session();

    let rogue = session.add_class("rogue").await.expect("add class");
    session
        .choose_class_skills(
            rogue,
            vec![
                "Stealth".into(),
                "Perception".into(),
                "Deception".into(),
                "Acrobatics".into(),
            ],
        )
        .expect("class skills");

    // Wood elf also grants Perception; the overlap is recorded, not merged away.
    session.select_race("wood-elf").await.expect("wood elf");
    assert_eq!(session.draft().speed(), 35);
    assert_eq!(
        session.draft().resolved_abilities().get(Ability::Dexterity),
        10
    );

    session.select_race("hill-dwarf").await.expect("hill dwarf");
    assert_eq!(session.draft().speed(), 25);

    let resolved = session.draft().resolved_abilities();
    assert_eq!(resolved.get(Ability::Dexterity), 8);
    assert_eq!(resolved.get(Ability::Constitution), 10);

    // Class skills survive both switches, including the one the elf duplicated.
    let skills = session.proficiencies().skills;
    assert_eq!(skills.get("Perception"), Some(&ProficiencyLevel::Proficient));
    assert_eq!(skills.get("Stealth"), Some(&ProficiencyLevel::Proficient));

    // Dwarf tools and weapon training arrived with the new race.
    let sets = session.proficiencies();
    assert!(sets.tools.contains("Smith's tools"));
}

#[tokio::test]
async fn level_up_to_four_requires_the_asi_choice() {
    let mut session = open_session();
    session.set_name("Maelis");
    session.select_race("wood-elf").await.expect("race");

    let wizard = session.add_class("wizard").await.expect("add class");
    session
        .choose_class_skills(wizard, vec!["Arcana".into(), "History".into()])
        .expect("skills");
    session
        .set_subclass(wizard, Some("Evocation".into()))
        .await
        .expect("subclass");
    session.set_class_level(wizard, 4).await.expect("level 4");

    // The unlocked ASI is auto-selected but incomplete.
    let err = session
        .validate_step(WizardStep::Class)
        .expect_err("incomplete ASI");
    assert!(err.to_string().contains("incomplete"));

    session
        .set_asi_ability_picks("wizard_asi_4", Some(Ability::Intelligence), None)
        .expect("pick INT");
    session.validate_step(WizardStep::Class).expect("complete");

    assert_eq!(
        session
            .draft()
            .resolved_abilities()
            .get(Ability::Intelligence),
        10
    );
}
