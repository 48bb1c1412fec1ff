// SPDX-License-Identifier: MIT

//! Schema installed by [`crate::Store::initialize`].

pub(crate) const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS jobs (
    id           TEXT PRIMARY KEY,
    command      TEXT NOT NULL,
    state        TEXT NOT NULL,
    attempts     INTEGER NOT NULL,
    max_retries  INTEGER NOT NULL,
    run_at       INTEGER NOT NULL,
    enqueued_at  INTEGER NOT NULL,
    last_error   TEXT,
    exit_code    INTEGER
);

CREATE INDEX IF NOT EXISTS jobs_dispatch_idx
    ON jobs (state, run_at, enqueued_at, id);

CREATE TABLE IF NOT EXISTS config (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;
