// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `queuectl`: enqueue/list/status/config/worker/dlq surface over a single
//! `queuectl-storage::Store` (§6). Everything here is a thin wrapper over
//! persistence operations except the worker-lifecycle commands.

mod commands;
mod error;
mod output;
mod registry;

use clap::{Parser, Subcommand};
use error::CliError;
use output::OutputFormat;
use queuectl_storage::Store;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "queuectl", about = "A persistent, multi-process background job queue")]
struct Cli {
    /// Path to the job queue database.
    #[arg(long, global = true, default_value = "queue.db")]
    db: PathBuf,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Enqueue a job from a JSON object `{"id": ..., "command": ...}`.
    Enqueue { json: String },
    /// Print job counts by state and the number of live workers.
    Status {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Tabular dump of jobs in one state.
    List {
        #[arg(long)]
        state: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Read or write a config key.
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommand,
    },
    /// Start or stop worker processes.
    Worker {
        #[command(subcommand)]
        command: commands::worker::WorkerCommand,
    },
    /// Inspect or requeue dead-lettered jobs.
    Dlq {
        #[command(subcommand)]
        command: commands::dlq::DlqCommand,
    },
}

fn now_ms() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as i64
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "queuectl=info,queuectl_storage=info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .init();
}

fn run(cli: Cli) -> error::Result<()> {
    let store = Store::open(&cli.db)?;
    let now = now_ms();

    match cli.command {
        Command::Enqueue { json } => commands::enqueue::run(&store, &json, now),
        Command::Status { format } => commands::status::run(&store, format),
        Command::List { state, format } => commands::list::run(&store, &state, format),
        Command::Config { command } => commands::config::run(&store, command),
        Command::Worker { command } => commands::worker::run(command, &cli.db, now),
        Command::Dlq { command } => commands::dlq::run(&store, command, now),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(exit_code(&err));
    }
}

fn exit_code(err: &CliError) -> i32 {
    err.code
}
