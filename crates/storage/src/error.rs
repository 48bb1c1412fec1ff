// SPDX-License-Identifier: MIT

use queuectl_core::ConfigError;
use thiserror::Error;

/// Errors surfaced by the persistence layer (§7).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("job id already exists: {0}")]
    DuplicateId(String),

    #[error("no such job: {0}")]
    NotFound(String),

    #[error("job {id} is not in state {expected}, found {found}")]
    WrongState { id: String, expected: &'static str, found: String },

    #[error("unknown state filter: {0}")]
    UnknownState(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no config value set for key: {0}")]
    ConfigNotSet(String),

    #[error("store is contended: gave up after {attempts} attempts")]
    Contention { attempts: u32 },
}

pub type Result<T> = std::result::Result<T, StorageError>;
