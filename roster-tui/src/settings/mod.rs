//! Settings system for typed key-value storage.

mod backend;
mod memory;
mod sqlite;

pub use backend::SettingsBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use log::LevelFilter;
use roster_lib::DEFAULT_ENDPOINT;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Settings error type.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(bincode::Error),
    #[error("deserialization error: {0}")]
    Deserialization(bincode::Error),
}

/// Typed settings provider.
///
/// Wraps a `SettingsBackend` with typed serialization via bincode.
#[derive(Clone)]
pub struct SettingsProvider {
    backend: Arc<dyn SettingsBackend>,
}

impl SettingsProvider {
    /// Create a new settings provider with the given backend.
    pub fn new(backend: impl SettingsBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Get a typed value for a key.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SettingsError> {
        match self.backend.get_bytes(key).await? {
            Some(bytes) => Ok(Some(
                bincode::deserialize(&bytes).map_err(SettingsError::Deserialization)?,
            )),
            None => Ok(None),
        }
    }

    /// Get a typed value, storing and returning `default` if the key is unset.
    pub async fn get_or_init<T: Serialize + DeserializeOwned + Sync>(
        &self,
        key: &str,
        default: T,
    ) -> Result<T, SettingsError> {
        match self.get(key).await? {
            Some(value) => Ok(value),
            None => {
                self.set(key, &default).await?;
                Ok(default)
            }
        }
    }

    /// Set a typed value for a key.
    pub async fn set<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), SettingsError> {
        let bytes = bincode::serialize(value).map_err(SettingsError::Serialization)?;
        self.backend.set_bytes(key, bytes).await
    }
}

/// Application configuration read from the settings store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    /// Member feed URL.
    pub endpoint: String,
    /// Request timeout for the initial load.
    pub timeout_secs: u64,
    /// Log level name (`error`, `warn`, `info`, `debug`, `trace`, `off`).
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 30,
            log_level: "debug".to_string(),
        }
    }
}

impl AppSettings {
    pub const ENDPOINT_KEY: &'static str = "client.endpoint";
    pub const TIMEOUT_KEY: &'static str = "client.timeout_secs";
    pub const LOG_LEVEL_KEY: &'static str = "log.level";

    /// Loads settings, writing defaults for any missing keys.
    pub async fn load(provider: &SettingsProvider) -> Result<Self, SettingsError> {
        let defaults = Self::default();
        Ok(Self {
            endpoint: provider
                .get_or_init(Self::ENDPOINT_KEY, defaults.endpoint)
                .await?,
            timeout_secs: provider
                .get_or_init(Self::TIMEOUT_KEY, defaults.timeout_secs)
                .await?,
            log_level: provider
                .get_or_init(Self::LOG_LEVEL_KEY, defaults.log_level)
                .await?,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parsed log level, `Debug` if the stored name is unknown.
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Debug)
    }
}
