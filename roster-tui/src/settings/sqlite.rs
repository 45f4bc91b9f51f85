//! SQLite settings backend.

use std::path::Path;

use async_sqlite::Client;
use async_trait::async_trait;
use dashmap::DashMap;
use log::debug;

use super::{SettingsBackend, SettingsError};

/// SQLite-backed settings storage.
///
/// The whole table is loaded into memory when opened; reads never touch the
/// database, writes go through to it.
pub struct SqliteBackend {
    client: Client,
    cache: DashMap<String, Vec<u8>>,
}

impl SqliteBackend {
    /// Opens (or creates) the settings database at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let client = async_sqlite::ClientBuilder::new()
            .path(path)
            .open()
            .await?;

        let rows = client
            .conn(|conn| {
                conn.execute(
                    "CREATE TABLE IF NOT EXISTS config (
                        key TEXT PRIMARY KEY,
                        value BLOB NOT NULL
                    )",
                    [],
                )?;
                let mut stmt = conn.prepare("SELECT key, value FROM config")?;
                let rows = stmt.query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
                })?;
                rows.collect::<Result<Vec<_>, _>>()
            })
            .await?;

        debug!("Loaded {} settings", rows.len());

        Ok(Self {
            client,
            cache: rows.into_iter().collect(),
        })
    }
}

#[async_trait]
impl SettingsBackend for SqliteBackend {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError> {
        Ok(self.cache.get(key).map(|v| v.value().clone()))
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), SettingsError> {
        let key_owned = key.to_string();
        let value_clone = value.clone();

        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO config (key, value) VALUES (?, ?)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    rusqlite::params![&key_owned, &value_clone],
                )
            })
            .await?;

        self.cache.insert(key.to_string(), value);
        Ok(())
    }
}
