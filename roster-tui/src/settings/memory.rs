//! In-memory settings backend.

use async_trait::async_trait;
use dashmap::DashMap;

use super::{SettingsBackend, SettingsError};

/// Settings kept only for the life of the process.
///
/// Used when no data directory is available, and in tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    store: DashMap<String, Vec<u8>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsBackend for MemoryBackend {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError> {
        Ok(self.store.get(key).map(|v| v.value().clone()))
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), SettingsError> {
        self.store.insert(key.to_string(), value);
        Ok(())
    }
}
