// SPDX-License-Identifier: MIT

//! Entry point for a single worker process, spawned detached by
//! `queuectl worker start` (§4.4). Never invoked directly by a user.

use clap::Parser;
use queuectl_core::SystemClock;
use queuectl_storage::Store;
use queuectl_worker::{shutdown_channel, WorkerLoop};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "queuectl-worker")]
struct Args {
    /// Path to the job queue database.
    #[arg(long, default_value = "queue.db")]
    db: PathBuf,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "queuectl_worker=info,queuectl_storage=info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let store = Arc::new(Store::open(&args.db)?);
    let (shutdown_tx, shutdown_rx) = shutdown_channel();

    let mut sigterm = install_sigterm_handler()?;
    tokio::spawn(async move {
        sigterm.wait().await;
        tracing::info!("received shutdown signal, draining");
        let _ = shutdown_tx.send(true);
    });

    let worker = WorkerLoop::new(store, SystemClock, shutdown_rx);
    worker.run().await;
    Ok(())
}

#[cfg(unix)]
fn install_sigterm_handler() -> anyhow::Result<SigtermHandle> {
    use tokio::signal::unix::{signal, SignalKind};
    Ok(SigtermHandle(signal(SignalKind::terminate())?))
}

#[cfg(unix)]
struct SigtermHandle(tokio::signal::unix::Signal);

#[cfg(unix)]
impl SigtermHandle {
    async fn wait(&mut self) {
        self.0.recv().await;
    }
}

#[cfg(not(unix))]
fn install_sigterm_handler() -> anyhow::Result<SigtermHandle> {
    Ok(SigtermHandle)
}

#[cfg(not(unix))]
struct SigtermHandle;

#[cfg(not(unix))]
impl SigtermHandle {
    async fn wait(&mut self) {
        // No POSIX signal semantics; fall back to Ctrl+C so the binary is
        // still controllable when run in a foreground terminal. `worker
        // stop`'s registry-based delivery is Unix-only (§4.4, §6).
        let _ = tokio::signal::ctrl_c().await;
    }
}
