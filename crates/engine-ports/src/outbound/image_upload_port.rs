//! Image upload port
//!
//! Cosmetic portrait uploads. Entirely outside the modifier ledger; a failed
//! upload never blocks creation.

use async_trait::async_trait;

/// Outbound port for portrait image uploads.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ImageUploadPort: Send + Sync {
    /// Upload image bytes, returning the stored image URL.
    async fn upload(&self, bytes: Vec<u8>, filename: &str) -> anyhow::Result<String>;
}
