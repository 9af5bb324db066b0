//! tiergate bot host.
//!
//! Wraps the core engine with everything a running bot needs: YAML config,
//! per-space config stores, the prefixed command pipeline, interactions, and
//! an HTTP ingress the platform adapter talks to. Consumed by `main.rs` and
//! the integration tests.

pub mod app_state;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod obs;
pub mod ops;
pub mod router;
pub mod services;
pub mod store;
pub mod transport;
