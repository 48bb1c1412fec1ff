// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! queuectl-worker: the worker loop and retry state machine (§4.3).
//!
//! A worker is a single-threaded, cooperatively-looping process: it has no
//! in-process concurrency beyond tokio driving the one job it is executing
//! and the idle-sleep timer.

mod exec;
mod fsm;
mod run;
mod settle;

pub use exec::{execute_job, ExecutionOutcome, LAUNCH_FAILURE_EXIT_CODE};
pub use fsm::{transition, WorkerEvent, WorkerPhase};
pub use run::{shutdown_channel, WorkerLoop};
pub use settle::{settle, Settlement};
