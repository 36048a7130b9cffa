//! Class catalog port
//!
//! Read-only async access to class definitions and their features.

use async_trait::async_trait;
use herodraft_domain::{ClassDefinition, ClassFeature, ClassSummary};

/// Outbound port for class lookups.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ClassCatalogPort: Send + Sync {
    /// List all selectable classes.
    async fn list_classes(&self) -> anyhow::Result<Vec<ClassSummary>>;

    /// Fetch one class definition by name or id.
    ///
    /// Returns `Ok(None)` if no class exists with that name.
    async fn get_class_details(&self, name: &str) -> anyhow::Result<Option<ClassDefinition>>;

    /// List the features a class grants up to and including `level`.
    ///
    /// Subclass features are included when `subclass` is set; hidden
    /// features only when `include_hidden` is true.
    async fn list_class_features<'a>(
        &self,
        class_id: &str,
        level: u8,
        subclass: Option<&'a str>,
        include_hidden: bool,
    ) -> anyhow::Result<Vec<ClassFeature>>;
}
