//! Per-space config persistence.
//!
//! Stores are dumb: no caching across calls and no versioning. Two concurrent
//! mutations of the same space resolve as last-writer-wins.

pub mod file;
pub mod memory;

use async_trait::async_trait;

use tiergate_core::{ConfigRecord, Result};

pub use file::FileConfigStore;
pub use memory::MemoryConfigStore;

#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load a space's record, creating and persisting an empty one on first access.
    async fn load(&self, space_id: &str) -> Result<ConfigRecord>;
    async fn save(&self, space_id: &str, record: &ConfigRecord) -> Result<()>;
}
