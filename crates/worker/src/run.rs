// SPDX-License-Identifier: MIT

//! The worker's main loop: acquire-one-job → execute → settle → idle-sleep
//! (§2, §4.3), with graceful shutdown via a `tokio::sync::watch` channel.

use crate::exec::execute_job;
use crate::fsm::{transition, WorkerEvent, WorkerPhase};
use crate::settle::{settle, Settlement};
use queuectl_core::{Clock, Job};
use queuectl_storage::Store;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info_span, trace, warn, Instrument};

const IDLE_SLEEP: Duration = Duration::from_secs(1);

/// Runs the acquire/execute/settle loop against `store` until told to
/// shut down. One instance corresponds to exactly one OS process.
pub struct WorkerLoop<C: Clock> {
    store: Arc<Store>,
    clock: C,
    shutdown: watch::Receiver<bool>,
}

impl<C: Clock> WorkerLoop<C> {
    pub fn new(store: Arc<Store>, clock: C, shutdown: watch::Receiver<bool>) -> Self {
        Self { store, clock, shutdown }
    }

    /// Current phase, exposed for tests; production code only needs it for
    /// the span fields attached to each attempt.
    pub async fn run(mut self) {
        let mut phase = WorkerPhase::Idle;
        loop {
            let shutdown_requested = *self.shutdown.borrow();
            if shutdown_requested && matches!(phase, WorkerPhase::Idle | WorkerPhase::Draining) {
                phase = WorkerPhase::Draining;
                break;
            }

            match self.store.fetch_job_atomically(self.clock.now_ms()) {
                Ok(Some(job)) => {
                    phase = transition(
                        &phase,
                        &WorkerEvent::DispatchHit { job_id: job.id.clone() },
                        shutdown_requested,
                    );
                    self.run_one(&job).await;
                    phase = transition(&phase, &WorkerEvent::Settled, *self.shutdown.borrow());
                }
                Ok(None) => {
                    phase = transition(&phase, &WorkerEvent::DispatchMiss, shutdown_requested);
                    trace!("idle tick");
                    tokio::select! {
                        _ = tokio::time::sleep(IDLE_SLEEP) => {}
                        _ = self.shutdown.changed() => {}
                    }
                }
                Err(err) => {
                    warn!(error = %err, "dispatch error, backing off");
                    tokio::time::sleep(IDLE_SLEEP).await;
                }
            }
        }
    }

    async fn run_one(&self, job: &Job) {
        let span = info_span!(
            "job_attempt",
            job_id = %job.id,
            attempt = job.attempts + 1,
            exit_code = tracing::field::Empty,
        );
        async {
            let outcome = execute_job(&job.command).await;
            tracing::Span::current().record("exit_code", outcome.exit_code);
            self.settle_outcome(job, outcome.exit_code, outcome.last_error.as_deref());
        }
        .instrument(span)
        .await;
    }

    fn settle_outcome(&self, job: &Job, exit_code: i32, last_error: Option<&str>) {
        let backoff_base = match self.store.config_backoff_base() {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "could not read backoff_base, defaulting to 2");
                2
            }
        };
        let now_ms = self.clock.now_ms();
        let decision = settle(exit_code, job.attempts, job.max_retries, backoff_base, now_ms);
        let result = match decision {
            Settlement::Completed => self.store.mark_completed(&job.id, exit_code),
            Settlement::Retry { attempts, run_at_ms } => {
                self.store.schedule_retry(&job.id, attempts, run_at_ms, last_error, exit_code)
            }
            Settlement::Dead { .. } => self.store.mark_dead(&job.id, last_error, exit_code),
        };
        if let Err(err) = result {
            warn!(job_id = %job.id, error = %err, "failed to persist settlement");
        }
    }
}

/// Build a shutdown channel pair: the sender lives with the signal handler,
/// the receiver is handed to [`WorkerLoop::new`].
pub fn shutdown_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}
