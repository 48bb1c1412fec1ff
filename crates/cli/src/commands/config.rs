// SPDX-License-Identifier: MIT

//! `queuectl config get|set` (§6).

use crate::error::Result;
use clap::Subcommand;
use queuectl_storage::Store;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the current value for a config key.
    Get { key: String },
    /// Validate and persist a value for a config key.
    Set { key: String, value: String },
}

pub fn run(store: &Store, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Get { key } => {
            let key = queuectl_core::ConfigKey::parse(&key).map_err(queuectl_storage::StorageError::from)?;
            println!("{}", store.config_get(key)?);
        }
        ConfigCommand::Set { key, value } => {
            store.config_set(&key, &value)?;
            println!("Set {key} = {value}");
        }
    }
    Ok(())
}
