// SPDX-License-Identifier: MIT

//! Error type that carries a process exit code, so `main()` is the only
//! place that calls `std::process::exit` (§7).

use queuectl_storage::StorageError;
use std::fmt;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(1, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<StorageError> for CliError {
    fn from(err: StorageError) -> Self {
        let code = match &err {
            StorageError::DuplicateId(_)
            | StorageError::NotFound(_)
            | StorageError::WrongState { .. }
            | StorageError::UnknownState(_)
            | StorageError::Config(_)
            | StorageError::ConfigNotSet(_) => 1,
            StorageError::Sqlite(_) | StorageError::Contention { .. } => 2,
        };
        Self::new(code, err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::input(format!("invalid JSON: {err}"))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::new(2, err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
