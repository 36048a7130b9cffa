pub mod in_memory;
pub mod reference;

pub use in_memory::{
    InMemoryBackgroundCatalog, InMemoryClassCatalog, InMemoryImageStore, InMemoryRaceCatalog,
};
