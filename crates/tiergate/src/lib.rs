//! Top-level facade crate for tiergate.
//!
//! Re-exports the authorization engine and the bot host so users can depend on a single crate.

pub mod core {
    pub use tiergate_core::*;
}

pub mod gateway {
    pub use tiergate_gateway::*;
}
