//! Built-in command services.

pub mod moderation;
pub mod roles;
pub mod setup;

pub use moderation::ModerationService;
pub use roles::CargoService;
pub use setup::SetupService;
