// SPDX-License-Identifier: MIT

//! Job table operations, including the dispatch primitive (§4.1, §4.2).

use crate::error::{Result, StorageError};
use crate::{Store, DISPATCH_CONTENTION_RETRIES};
use queuectl_core::{truncate_last_error, Job, JobState};
use rand::Rng;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, TransactionBehavior};
use std::time::Duration;

/// Counts by state, for `status` (§6).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub pending: u64,
    pub processing: u64,
    pub completed: u64,
    pub dead: u64,
}

impl Store {
    /// Insert a `pending` job. Fails with [`StorageError::DuplicateId`] if
    /// `id` already exists (§3, §7). `max_retries` is snapshotted from the
    /// live config at this instant.
    pub fn create_job(&self, id: &str, command: &str, now_ms: i64) -> Result<Job> {
        let max_retries = self.config_max_retries()?;
        {
            let conn = self.conn.lock();
            let result = conn.execute(
                "INSERT INTO jobs
                    (id, command, state, attempts, max_retries, run_at, enqueued_at, last_error, exit_code)
                 VALUES (?1, ?2, 'pending', 0, ?3, ?4, ?4, NULL, NULL)",
                rusqlite::params![id, command, max_retries, now_ms],
            );
            match result {
                Ok(_) => {}
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    return Err(StorageError::DuplicateId(id.to_string()));
                }
                Err(other) => return Err(StorageError::from(other)),
            }
        }
        self.get_job(id)?.ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    /// Look up a single job by id.
    pub fn get_job(&self, id: &str) -> Result<Option<Job>> {
        let conn = self.conn.lock();
        conn.query_row("SELECT * FROM jobs WHERE id = ?1", [id], row_to_job)
            .optional()
            .map_err(StorageError::from)
    }

    /// The dispatch primitive (§4.2): atomically claim the oldest eligible
    /// `pending` job and flip it to `processing`. Retries on `SQLITE_BUSY`
    /// up to [`DISPATCH_CONTENTION_RETRIES`] times before surfacing
    /// [`StorageError::Contention`].
    pub fn fetch_job_atomically(&self, now_ms: i64) -> Result<Option<Job>> {
        let mut attempt = 0u32;
        loop {
            match self.try_fetch_job_atomically(now_ms) {
                Err(StorageError::Sqlite(err)) if is_busy(&err) => {
                    if attempt >= DISPATCH_CONTENTION_RETRIES {
                        tracing::warn!(attempts = attempt, "dispatch gave up under contention");
                        return Err(StorageError::Contention { attempts: attempt });
                    }
                    attempt += 1;
                    let jitter_ms = rand::thread_rng().gen_range(10..50) * u64::from(attempt);
                    tracing::debug!(attempt, jitter_ms, "dispatch contended, retrying");
                    std::thread::sleep(Duration::from_millis(jitter_ms));
                }
                other => return other,
            }
        }
    }

    fn try_fetch_job_atomically(&self, now_ms: i64) -> Result<Option<Job>> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let candidate: Option<String> = tx
            .query_row(
                "SELECT id FROM jobs
                 WHERE state = 'pending' AND run_at <= ?1
                 ORDER BY run_at ASC, enqueued_at ASC, id ASC
                 LIMIT 1",
                [now_ms],
                |row| row.get(0),
            )
            .optional()?;

        let Some(id) = candidate else {
            tx.commit()?;
            return Ok(None);
        };

        // Re-checked in the WHERE clause: the row only flips if it is still
        // pending at write time, so this stays correct even if the isolation
        // guarantee above were ever weakened.
        let claimed = tx.execute(
            "UPDATE jobs SET state = 'processing' WHERE id = ?1 AND state = 'pending'",
            [&id],
        )?;
        if claimed == 0 {
            tx.commit()?;
            return Ok(None);
        }

        let job = tx.query_row("SELECT * FROM jobs WHERE id = ?1", [&id], row_to_job)?;
        tx.commit()?;
        Ok(Some(job))
    }

    /// Settle a successful attempt. Requires prior state `processing` (§4.1).
    pub fn mark_completed(&self, id: &str, exit_code: i32) -> Result<()> {
        let conn = self.conn.lock();
        let rows = conn.execute(
            "UPDATE jobs SET state = 'completed', exit_code = ?2
             WHERE id = ?1 AND state = 'processing'",
            rusqlite::params![id, exit_code],
        )?;
        require_transitioned(&conn, id, rows, "processing")
    }

    /// Settle a failed attempt that still has retry budget left (§4.3).
    pub fn schedule_retry(
        &self,
        id: &str,
        attempts: u32,
        run_at: i64,
        last_error: Option<&str>,
        exit_code: i32,
    ) -> Result<()> {
        let truncated = last_error.map(truncate_last_error);
        let conn = self.conn.lock();
        let rows = conn.execute(
            "UPDATE jobs SET state = 'pending', attempts = ?2, run_at = ?3,
                last_error = ?4, exit_code = ?5
             WHERE id = ?1 AND state = 'processing'",
            rusqlite::params![id, attempts, run_at, truncated, exit_code],
        )?;
        require_transitioned(&conn, id, rows, "processing")
    }

    /// Settle a failed attempt whose retry budget is exhausted (§4.3).
    pub fn mark_dead(&self, id: &str, last_error: Option<&str>, exit_code: i32) -> Result<()> {
        let truncated = last_error.map(truncate_last_error);
        let conn = self.conn.lock();
        let rows = conn.execute(
            "UPDATE jobs SET state = 'dead', last_error = ?2, exit_code = ?3
             WHERE id = ?1 AND state = 'processing'",
            rusqlite::params![id, truncated, exit_code],
        )?;
        require_transitioned(&conn, id, rows, "processing")
    }

    /// Read-only enumeration of jobs in `state`, oldest-enqueued first (§4.1).
    pub fn list_by_state(&self, state: JobState) -> Result<Vec<Job>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT * FROM jobs WHERE state = ?1 ORDER BY enqueued_at ASC",
        )?;
        let jobs = stmt
            .query_map([state.as_str()], row_to_job)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(jobs)
    }

    /// Same as [`Store::list_by_state`], but parses `raw` itself and rejects
    /// an unrecognized filter with [`StorageError::UnknownState`] (§6, §7).
    pub fn list_by_state_str(&self, raw: &str) -> Result<Vec<Job>> {
        let state = JobState::parse(raw).ok_or_else(|| StorageError::UnknownState(raw.to_string()))?;
        self.list_by_state(state)
    }

    /// Counts by state, for `status` (§6).
    pub fn summary(&self) -> Result<Summary> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT state, COUNT(*) FROM jobs GROUP BY state")?;
        let mut summary = Summary::default();
        let rows = stmt.query_map([], |row| {
            let state: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((state, count as u64))
        })?;
        for row in rows {
            let (state, count) = row?;
            match state.as_str() {
                "pending" => summary.pending = count,
                "processing" => summary.processing = count,
                "completed" => summary.completed = count,
                "dead" => summary.dead = count,
                _ => {}
            }
        }
        Ok(summary)
    }

    /// Requeue a dead job with a fresh retry budget (§3, §4.1, open question
    /// in §9 resolved as: re-snapshot `max_retries` from current config).
    pub fn dlq_requeue(&self, id: &str, now_ms: i64) -> Result<()> {
        let max_retries = self.config_max_retries()?;
        let conn = self.conn.lock();
        let rows = conn.execute(
            "UPDATE jobs SET state = 'pending', attempts = 0, max_retries = ?2,
                run_at = ?3, last_error = NULL, exit_code = NULL
             WHERE id = ?1 AND state = 'dead'",
            rusqlite::params![id, max_retries, now_ms],
        )?;
        require_transitioned(&conn, id, rows, "dead")
    }
}

fn row_to_job(row: &Row) -> rusqlite::Result<Job> {
    let state_raw: String = row.get("state")?;
    let state = JobState::parse(&state_raw).unwrap_or(JobState::Pending);
    Ok(Job {
        id: row.get("id")?,
        command: row.get("command")?,
        state,
        attempts: row.get("attempts")?,
        max_retries: row.get("max_retries")?,
        run_at: row.get("run_at")?,
        enqueued_at: row.get("enqueued_at")?,
        last_error: row.get("last_error")?,
        exit_code: row.get("exit_code")?,
    })
}

fn require_transitioned(
    conn: &Connection,
    id: &str,
    rows_affected: usize,
    expected: &'static str,
) -> Result<()> {
    if rows_affected > 0 {
        return Ok(());
    }
    let found: Option<String> = conn
        .query_row("SELECT state FROM jobs WHERE id = ?1", [id], |row| row.get(0))
        .optional()?;
    match found {
        Some(found) => Err(StorageError::WrongState { id: id.to_string(), expected, found }),
        None => Err(StorageError::NotFound(id.to_string())),
    }
}

fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == ErrorCode::DatabaseBusy || inner.code == ErrorCode::DatabaseLocked
    )
}


#[cfg(test)]
mod invariants {
    use super::*;
    use crate::Store;
    use proptest::prelude::*;

    proptest! {
        /// §8 invariant 2: every dispatched job was `pending` with an eligible
        /// `run_at`, and invariant 3: it is never dispatched past its budget.
        #[test]
        fn eligibility_and_terminal_stability(
            run_ats in prop::collection::vec(0i64..1000, 1..20),
        ) {
            let store = Store::open_in_memory().unwrap();
            for (i, run_at) in run_ats.iter().enumerate() {
                let id = format!("job-{i}");
                store.create_job(&id, "true", *run_at).unwrap();
            }

            let now = 500;
            let mut seen = std::collections::HashSet::new();
            while let Some(job) = store.fetch_job_atomically(now).unwrap() {
                prop_assert!(!seen.contains(&job.id), "job {} dispatched twice", job.id);
                seen.insert(job.id.clone());
                store.mark_completed(&job.id, 0).unwrap();
                // A completed job must never be eligible again.
                prop_assert!(store.get_job(&job.id).unwrap().unwrap().state == JobState::Completed);
            }

            for (i, run_at) in run_ats.iter().enumerate() {
                if *run_at <= now {
                    prop_assert!(seen.contains(&format!("job-{i}")));
                }
            }
        }
    }
}
