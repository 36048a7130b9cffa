pub mod application;

pub use application::services::{CharacterCreationService, WizardStep};
