// SPDX-License-Identifier: MIT

//! Shell execution contract for a job's `command` (§4.3).

use queuectl_core::truncate_last_error;
use std::process::Stdio;
use tokio::process::Command;

/// Outcome of running one job attempt.
pub struct ExecutionOutcome {
    pub exit_code: i32,
    pub last_error: Option<String>,
}

#[cfg(unix)]
const SHELL: &str = "/bin/sh";
#[cfg(unix)]
const SHELL_FLAG: &str = "-c";
#[cfg(windows)]
const SHELL: &str = "cmd";
#[cfg(windows)]
const SHELL_FLAG: &str = "/C";

/// Exit code synthesized when the command cannot even be launched (e.g. the
/// shell itself is missing), per §4.3.
pub const LAUNCH_FAILURE_EXIT_CODE: i32 = 127;

/// Hand `command` to a shell, capture stdout/stderr, and translate the
/// result into a settlement-ready outcome. A spawn failure is reported as
/// [`LAUNCH_FAILURE_EXIT_CODE`] with the spawn error's message as
/// `last_error`, never as a propagated `Err` — execution failure is a
/// normal FSM outcome, not an error the caller handles specially (§7).
pub async fn execute_job(command: &str) -> ExecutionOutcome {
    let result = Command::new(SHELL)
        .arg(SHELL_FLAG)
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(output) => {
            let exit_code = output.status.code().unwrap_or(LAUNCH_FAILURE_EXIT_CODE);
            let stderr = String::from_utf8_lossy(&output.stderr);
            let last_error =
                if stderr.trim().is_empty() { None } else { Some(truncate_last_error(stderr.trim_end())) };
            ExecutionOutcome { exit_code, last_error }
        }
        Err(err) => ExecutionOutcome {
            exit_code: LAUNCH_FAILURE_EXIT_CODE,
            last_error: Some(truncate_last_error(&err.to_string())),
        },
    }
}
