// SPDX-License-Identifier: MIT

//! `queuectl enqueue <json>` (§6).

use crate::error::{CliError, Result};
use queuectl_storage::Store;
use serde::Deserialize;

/// Exactly two required string fields; unknown fields are rejected (§6).
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct EnqueueInput {
    id: String,
    command: String,
}

pub fn run(store: &Store, json: &str, now_ms: i64) -> Result<()> {
    let input: EnqueueInput = serde_json::from_str(json)?;
    if input.id.is_empty() {
        return Err(CliError::input("job id must not be empty"));
    }
    let job = store.create_job(&input.id, &input.command, now_ms)?;
    println!("Enqueued job '{}'", job.id);
    Ok(())
}
