// SPDX-License-Identifier: MIT

//! Job record and lifecycle states (§3, §4.3).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a job.
///
/// `Processing` means exactly one worker currently owns the row; `Completed`
/// and `Dead` are terminal (only [`Dead`](JobState::Dead) can leave its
/// terminal state, via an explicit DLQ retry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Dead,
}

impl JobState {
    pub const fn as_str(self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Processing => "processing",
            JobState::Completed => "completed",
            JobState::Dead => "dead",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(JobState::Pending),
            "processing" => Some(JobState::Processing),
            "completed" => Some(JobState::Completed),
            "dead" => Some(JobState::Dead),
            _ => None,
        }
    }

    pub const ALL: [JobState; 4] =
        [JobState::Pending, JobState::Processing, JobState::Completed, JobState::Dead];
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job row as read back from storage (§3 table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub command: String,
    pub state: JobState,
    pub attempts: u32,
    pub max_retries: u32,
    pub run_at: i64,
    pub enqueued_at: i64,
    pub last_error: Option<String>,
    pub exit_code: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_round_trips_through_str() {
        for state in JobState::ALL {
            assert_eq!(JobState::parse(state.as_str()), Some(state));
        }
    }

    #[test]
    fn unknown_state_string_is_none() {
        assert_eq!(JobState::parse("bogus"), None);
    }
}
