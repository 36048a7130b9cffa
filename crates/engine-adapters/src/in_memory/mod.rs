//! In-memory catalog adapters.
//!
//! Port implementations backed by plain vectors; they serve the demo runner
//! and integration tests without a backing store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use herodraft_domain::{
    BackgroundDefinition, BackgroundSummary, ClassDefinition, ClassFeature, ClassSummary,
    RaceDefinition, RaceSummary,
};
use herodraft_engine_ports::outbound::{
    BackgroundCatalogPort, ClassCatalogPort, ImageUploadPort, RaceCatalogPort,
};

use crate::reference;

/// Race catalog backed by a vector.
pub struct InMemoryRaceCatalog {
    races: Vec<RaceDefinition>,
}

impl InMemoryRaceCatalog {
    pub fn new(races: Vec<RaceDefinition>) -> Self {
        Self { races }
    }

    /// Seed from the reference data set.
    pub fn with_reference_data() -> Self {
        Self::new(reference::races())
    }
}

#[async_trait]
impl RaceCatalogPort for InMemoryRaceCatalog {
    async fn list_races(&self) -> anyhow::Result<Vec<RaceSummary>> {
        Ok(self.races.iter().map(|r| r.summary()).collect())
    }

    async fn get_race_details(&self, id: &str) -> anyhow::Result<Option<RaceDefinition>> {
        Ok(self.races.iter().find(|r| r.id == id).cloned())
    }
}

/// Class catalog backed by vectors of definitions and features.
pub struct InMemoryClassCatalog {
    classes: Vec<ClassDefinition>,
    features: Vec<ClassFeature>,
}

impl InMemoryClassCatalog {
    pub fn new(classes: Vec<ClassDefinition>, features: Vec<ClassFeature>) -> Self {
        Self { classes, features }
    }

    pub fn with_reference_data() -> Self {
        Self::new(reference::classes(), reference::class_features())
    }
}

#[async_trait]
impl ClassCatalogPort for InMemoryClassCatalog {
    async fn list_classes(&self) -> anyhow::Result<Vec<ClassSummary>> {
        Ok(self.classes.iter().map(|c| c.summary()).collect())
    }

    async fn get_class_details(&self, name: &str) -> anyhow::Result<Option<ClassDefinition>> {
        Ok(self
            .classes
            .iter()
            .find(|c| c.id == name || c.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn list_class_features<'a>(
        &self,
        class_id: &str,
        level: u8,
        subclass: Option<&'a str>,
        include_hidden: bool,
    ) -> anyhow::Result<Vec<ClassFeature>> {
        Ok(self
            .features
            .iter()
            .filter(|f| f.class_id == class_id)
            .filter(|f| f.level <= level)
            .filter(|f| match &f.subclass_id {
                Some(required) => subclass == Some(required.as_str()),
                None => true,
            })
            .filter(|f| include_hidden || !f.hidden)
            .cloned()
            .collect())
    }
}

/// Background catalog backed by a vector.
pub struct InMemoryBackgroundCatalog {
    backgrounds: Vec<BackgroundDefinition>,
}

impl InMemoryBackgroundCatalog {
    pub fn new(backgrounds: Vec<BackgroundDefinition>) -> Self {
        Self { backgrounds }
    }

    pub fn with_reference_data() -> Self {
        Self::new(reference::backgrounds())
    }
}

#[async_trait]
impl BackgroundCatalogPort for InMemoryBackgroundCatalog {
    async fn list_backgrounds(&self) -> anyhow::Result<Vec<BackgroundSummary>> {
        Ok(self.backgrounds.iter().map(|b| b.summary()).collect())
    }

    async fn get_background_details(
        &self,
        id: &str,
    ) -> anyhow::Result<Option<BackgroundDefinition>> {
        Ok(self.backgrounds.iter().find(|b| b.id == id).cloned())
    }
}

/// Image store that keeps uploads in process memory.
#[derive(Default)]
pub struct InMemoryImageStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored images.
    pub fn len(&self) -> usize {
        self.files.lock().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ImageUploadPort for InMemoryImageStore {
    async fn upload(&self, bytes: Vec<u8>, filename: &str) -> anyhow::Result<String> {
        if bytes.is_empty() {
            anyhow::bail!("refusing to store an empty image: {}", filename);
        }
        let url = format!("mem://{}", filename);
        let mut files = self
            .files
            .lock()
            .map_err(|_| anyhow::anyhow!("image store poisoned"))?;
        files.insert(url.clone(), bytes);
        Ok(url)
    }
}
