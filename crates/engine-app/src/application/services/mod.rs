//! Application services.

pub mod creation_service;
pub mod wizard;

pub use creation_service::CharacterCreationService;
pub use wizard::WizardStep;
