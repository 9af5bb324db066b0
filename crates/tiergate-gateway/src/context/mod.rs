//! Inbound event types and the per-command context handed to services.
//!
//! Events arrive from the platform adapter already resolved: the author's
//! role ids and the mentioned roles/members/channels are part of the payload,
//! so nothing in this crate talks to the platform directly.

pub mod command;
pub mod event;

pub use command::CommandCtx;
pub use event::{Author, InteractionEvent, InteractionKind, MemberMention, Mentions, MessageEvent, RoleMention};
