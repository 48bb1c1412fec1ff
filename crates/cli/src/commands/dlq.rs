// SPDX-License-Identifier: MIT

//! `queuectl dlq list|retry` (§6).

use crate::error::Result;
use crate::output::{handle_list, OutputFormat};
use clap::Subcommand;
use queuectl_core::JobState;
use queuectl_storage::Store;

#[derive(Subcommand)]
pub enum DlqCommand {
    /// List jobs with state = dead.
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Requeue a dead job with a fresh retry budget.
    Retry { id: String },
}

pub fn run(store: &Store, command: DlqCommand, now_ms: i64) -> Result<()> {
    match command {
        DlqCommand::List { format } => {
            let jobs = store.list_by_state(JobState::Dead)?;
            handle_list(format, &jobs, "No dead jobs", |jobs| {
                for job in jobs {
                    println!(
                        "{} attempts={} exit_code={} last_error={}",
                        job.id,
                        job.attempts,
                        job.exit_code.map(|c| c.to_string()).unwrap_or_else(|| "-".into()),
                        job.last_error.as_deref().unwrap_or("-"),
                    );
                }
            })?;
        }
        DlqCommand::Retry { id } => {
            store.dlq_requeue(&id, now_ms)?;
            println!("Requeued '{id}'");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_requires_prior_dead_state() {
        let store = Store::open_in_memory().unwrap();
        store.create_job("a", "false", 0).unwrap();
        let err = run(&store, DlqCommand::Retry { id: "a".into() }, 0).unwrap_err();
        assert_eq!(err.code, 1);
    }
}
