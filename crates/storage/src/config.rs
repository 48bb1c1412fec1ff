// SPDX-License-Identifier: MIT

//! Config table operations (§4.1).

use crate::error::{Result, StorageError};
use crate::Store;
use queuectl_core::{ConfigKey, DEFAULT_BACKOFF_BASE, DEFAULT_MAX_RETRIES};

impl Store {
    /// Read the current value for `key`, falling back to the documented
    /// default when no row has been written yet.
    pub fn config_get(&self, key: ConfigKey) -> Result<String> {
        let conn = self.conn.lock();
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM config WHERE key = ?1",
                [key.as_str()],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(StorageError::Sqlite(other)),
            })?;
        Ok(value.unwrap_or_else(|| default_for(key).to_string()))
    }

    /// Read `max_retries` as its validated integer form, used to snapshot a
    /// new job's retry budget (§3).
    pub fn config_max_retries(&self) -> Result<u32> {
        let raw = self.config_get(ConfigKey::MaxRetries)?;
        ConfigKey::MaxRetries.validate(&raw).map_err(StorageError::from)
    }

    /// Read `backoff_base` as its validated integer form, used by the
    /// worker's retry-scheduling decision (§4.3).
    pub fn config_backoff_base(&self) -> Result<u32> {
        let raw = self.config_get(ConfigKey::BackoffBase)?;
        ConfigKey::BackoffBase.validate(&raw).map_err(StorageError::from)
    }

    /// Validate and persist `value` for `key`. Rejects unknown keys and
    /// malformed values without touching the table (§3, §7).
    pub fn config_set(&self, key: &str, value: &str) -> Result<()> {
        let key = ConfigKey::parse(key)?;
        key.validate(value)?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key.as_str(), value],
        )?;
        Ok(())
    }
}

fn default_for(key: ConfigKey) -> String {
    match key {
        ConfigKey::MaxRetries => DEFAULT_MAX_RETRIES.to_string(),
        ConfigKey::BackoffBase => DEFAULT_BACKOFF_BASE.to_string(),
    }
}
