use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use herodraft_domain::contributions::{BackgroundChoices, RaceChoices};
use herodraft_domain::Ability;
use herodraft_engine_adapters::{
    InMemoryBackgroundCatalog, InMemoryClassCatalog, InMemoryRaceCatalog,
};
use herodraft_engine_app::CharacterCreationService;

pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut session = CharacterCreationService::new(
        Arc::new(InMemoryRaceCatalog::with_reference_data()),
        Arc::new(InMemoryClassCatalog::with_reference_data()),
        Arc::new(InMemoryBackgroundCatalog::with_reference_data()),
    );

    info!("Opening a demonstration creation session");
    session.set_name("Brenn Ironside");

    session.select_race("human").await?;
    session.update_race_choices(RaceChoices {
        language_picks: vec!["Dwarvish".into()],
        ..RaceChoices::default()
    })?;

    let fighter = session.add_class("fighter").await?;
    session.choose_class_skills(fighter, vec!["Athletics".into(), "Perception".into()])?;

    session.select_background("soldier").await?;
    session.update_background_choices(BackgroundChoices {
        tool_picks: vec!["Vehicles (land)".into()],
        ..BackgroundChoices::default()
    })?;

    session.try_set_base_score(Ability::Strength, 15)?;
    session.try_set_base_score(Ability::Constitution, 15)?;
    session.try_set_base_score(Ability::Dexterity, 14)?;
    session.try_set_base_score(Ability::Wisdom, 10)?;

    let hit_points = session.roll_hit_points()?;
    info!(total = hit_points.total, "Hit points rolled");

    let record = session.finalize()?;
    let json = serde_json::to_string_pretty(&record)
        .context("Failed to serialize the creation record")?;
    println!("{}", json);
    Ok(())
}
