//! Race catalog port
//!
//! Read-only async access to race definitions in the backing store. Loads
//! never mutate the draft; the application service applies a loaded
//! definition only after the predecessor source has been reverted.

use async_trait::async_trait;
use herodraft_domain::{RaceDefinition, RaceSummary};

/// Outbound port for race lookups.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait RaceCatalogPort: Send + Sync {
    /// List all selectable races.
    async fn list_races(&self) -> anyhow::Result<Vec<RaceSummary>>;

    /// Fetch one race definition by id.
    ///
    /// Returns `Ok(None)` if no race exists with that id.
    async fn get_race_details(&self, id: &str) -> anyhow::Result<Option<RaceDefinition>>;
}
