// SPDX-License-Identifier: MIT

//! `queuectl status` (§6).

use crate::error::Result;
use crate::output::{format_or_json, OutputFormat};
use crate::registry;
use queuectl_storage::Store;
use serde::Serialize;

#[derive(Serialize)]
struct StatusReport {
    pending: u64,
    processing: u64,
    completed: u64,
    dead: u64,
    active_workers: usize,
}

pub fn run(store: &Store, format: OutputFormat) -> Result<()> {
    let summary = store.summary()?;
    let active_workers = registry::list()?.len();
    let report = StatusReport {
        pending: summary.pending,
        processing: summary.processing,
        completed: summary.completed,
        dead: summary.dead,
        active_workers,
    };
    format_or_json(format, &report, || {
        println!("Pending:    {}", report.pending);
        println!("Processing: {}", report.processing);
        println!("Completed:  {}", report.completed);
        println!("Dead:       {}", report.dead);
        println!("Active Workers: {}", report.active_workers);
    })?;
    Ok(())
}
