// SPDX-License-Identifier: MIT

//! The worker's phase, as a tagged variant transitioned by a pure function
//! of `(phase, event, shutdown_requested)` (§9).
//!
//! A real `tokio::process::Child` is not carried inside [`WorkerPhase`]:
//! there is exactly one job in flight per worker process, so the child
//! handle lives in the run loop's stack frame and the phase only tracks
//! which job (if any) currently owns it, which is what logging and the
//! transition tests need.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerPhase {
    Idle,
    Executing { job_id: String },
    Draining,
}

#[derive(Debug, Clone)]
pub enum WorkerEvent {
    DispatchHit { job_id: String },
    DispatchMiss,
    Settled,
}

/// Advance `phase` given `event`. `shutdown_requested` reflects whether a
/// shutdown signal has been observed; it is not itself an event because it
/// is sticky (once true, stays true for the rest of the process) rather
/// than something the loop reacts to exactly once.
pub fn transition(phase: &WorkerPhase, event: &WorkerEvent, shutdown_requested: bool) -> WorkerPhase {
    match (phase, event) {
        (WorkerPhase::Idle, WorkerEvent::DispatchHit { job_id }) if !shutdown_requested => {
            WorkerPhase::Executing { job_id: job_id.clone() }
        }
        (WorkerPhase::Idle, _) if shutdown_requested => WorkerPhase::Draining,
        (WorkerPhase::Executing { job_id }, WorkerEvent::Settled) => {
            if shutdown_requested {
                WorkerPhase::Draining
            } else {
                let _ = job_id;
                WorkerPhase::Idle
            }
        }
        (current, _) => current.clone(),
    }
}
