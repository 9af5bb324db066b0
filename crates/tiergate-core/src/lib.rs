//! tiergate core: the tiered authorization engine.
//!
//! This crate owns the per-space configuration model, the legacy schema
//! migration, and the resolvers that turn an actor's role memberships into an
//! authorization decision. It performs no I/O and needs no async runtime, so
//! the bot host, tooling, and tests can all share it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! Every denial is an ordinary `TierError`/`Option` value so a malformed
//! record or hostile command text never takes the host process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod access;
pub mod duration;
pub mod error;
pub mod model;
pub mod moderation;
pub mod normalize;
pub mod registry;

/// Shared result type.
pub use error::{DenialCode, Result, TierError};
pub use access::{resolve_access, TierAccess};
pub use model::{ConfigRecord, RoleId, Tier, Tiers};
pub use moderation::{resolve_requirement, ModerationRequirement, MAX_TIMEOUT_MS};
pub use normalize::normalize;
pub use registry::{RoleList, TierRegistry};
