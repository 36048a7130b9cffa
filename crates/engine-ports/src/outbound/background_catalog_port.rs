//! Background catalog port
//!
//! Read-only async access to background definitions.

use async_trait::async_trait;
use herodraft_domain::{BackgroundDefinition, BackgroundSummary};

/// Outbound port for background lookups.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BackgroundCatalogPort: Send + Sync {
    /// List all selectable backgrounds.
    async fn list_backgrounds(&self) -> anyhow::Result<Vec<BackgroundSummary>>;

    /// Fetch one background definition by id.
    ///
    /// Returns `Ok(None)` if no background exists with that id.
    async fn get_background_details(
        &self,
        id: &str,
    ) -> anyhow::Result<Option<BackgroundDefinition>>;
}
