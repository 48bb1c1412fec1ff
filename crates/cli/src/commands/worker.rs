// SPDX-License-Identifier: MIT

//! `queuectl worker start|stop` (§4.4, §6).

use crate::error::{CliError, Result};
use crate::registry;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum WorkerCommand {
    /// Spawn `count` detached workers.
    Start {
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
    /// Signal every registered worker for graceful shutdown.
    Stop,
}

pub fn run(command: WorkerCommand, db: &Path, now_ms: i64) -> Result<()> {
    match command {
        WorkerCommand::Start { count } => {
            if count == 0 {
                return Err(CliError::input("worker count must be at least 1"));
            }
            for _ in 0..count {
                let pid = registry::spawn_worker(db, now_ms)?;
                println!("Started worker (pid {pid})");
            }
        }
        WorkerCommand::Stop => {
            let stopped = registry::stop_all()?;
            println!("Signaled {stopped} worker(s) to stop");
        }
    }
    Ok(())
}
