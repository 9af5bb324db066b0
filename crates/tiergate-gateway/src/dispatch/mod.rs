//! Event handling: command registry, the per-message pipeline, interactions,
//! and the `Outcome` handed back to the platform adapter.

pub mod dispatcher;
pub mod interactions;
pub mod outcome;
pub mod pipeline;

pub use dispatcher::{CommandService, Dispatcher};
pub use interactions::handle_interaction;
pub use outcome::{AuditEntry, AuditEvent, Outcome, PlatformAction, Reply, TierListing, TierSummary, Visibility};
pub use pipeline::handle_message;
