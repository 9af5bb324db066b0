//! In-process store for tests and throwaway runs.

use async_trait::async_trait;
use dashmap::DashMap;

use tiergate_core::{ConfigRecord, Result};

use super::ConfigStore;

#[derive(Default)]
pub struct MemoryConfigStore {
    records: DashMap<String, ConfigRecord>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Seed a record as if it had been stored earlier.
    pub fn insert(&self, space_id: &str, record: ConfigRecord) {
        self.records.insert(space_id.to_string(), record);
    }

    pub fn snapshot(&self, space_id: &str) -> Option<ConfigRecord> {
        self.records.get(space_id).map(|r| r.value().clone())
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn load(&self, space_id: &str) -> Result<ConfigRecord> {
        Ok(self
            .records
            .entry(space_id.to_string())
            .or_default()
            .value()
            .clone())
    }

    async fn save(&self, space_id: &str, record: &ConfigRecord) -> Result<()> {
        self.records.insert(space_id.to_string(), record.clone());
        Ok(())
    }
}
