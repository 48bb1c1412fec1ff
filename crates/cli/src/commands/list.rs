// SPDX-License-Identifier: MIT

//! `queuectl list --state <s>` (§6).

use crate::error::Result;
use crate::output::{handle_list, OutputFormat};
use queuectl_storage::Store;

pub fn run(store: &Store, state: &str, format: OutputFormat) -> Result<()> {
    let jobs = store.list_by_state_str(state)?;
    handle_list(format, &jobs, "No jobs found", |jobs| {
        println!("{:<20} {:<12} {:>9} {:>12} {:>11}", "ID", "STATE", "ATTEMPTS", "EXIT_CODE", "RUN_AT");
        for job in jobs {
            println!(
                "{:<20} {:<12} {:>9} {:>12} {:>11}",
                job.id,
                job.state,
                job.attempts,
                job.exit_code.map(|c| c.to_string()).unwrap_or_else(|| "-".into()),
                job.run_at,
            );
        }
    })?;
    Ok(())
}
