// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! queuectl-storage: the persistence layer.
//!
//! A single SQLite database (`journal_mode=WAL`) holds every job and config
//! row. [`Store::fetch_job_atomically`] is the dispatch primitive (§4.2): it
//! is the only place two independent worker processes contend with each
//! other, and it is safe under that contention because it is backed by an
//! immediate-write-reserving SQLite transaction rather than any in-process
//! lock.

mod config;
mod error;
mod jobs;
mod schema;

pub use error::{Result, StorageError};

use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// Number of `SQLITE_BUSY` retries `fetch_job_atomically` tolerates before
/// surfacing [`StorageError::Contention`] (§7: "indicates a stuck lock").
const DISPATCH_CONTENTION_RETRIES: u32 = 3;

/// Handle to the job queue's database.
///
/// One `Store` wraps one `rusqlite::Connection`; the connection is the only
/// mutable state, held behind a lock purely so methods can take `&self`
/// (each process — CLI invocation or worker — owns exactly one `Store` and
/// never shares it across threads in anger).
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (creating if absent) the database at `path`, put it into WAL
    /// mode, and install the schema. Idempotent: safe to call once per
    /// process against an already-initialized file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory store for unit tests. WAL mode is meaningless without a
    /// backing file, but `BEGIN IMMEDIATE` semantics — what the dispatch
    /// primitive actually relies on — work the same way.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "journal_mode", "WAL").or_else(|err| {
            // In-memory databases reject WAL and silently stay in their
            // default mode; every other error is real.
            if conn.is_autocommit() {
                Ok(())
            } else {
                Err(err)
            }
        })?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        let store = Self { conn: Mutex::new(conn) };
        store.initialize()?;
        Ok(store)
    }

    /// Install the schema. No-op on subsequent calls (§4.1).
    fn initialize(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute_batch(schema::SCHEMA_SQL)?;
        Ok(())
    }
}
