//! Scenarios 1 and 3 (§8): a worker that runs a real job to completion, and
//! one that treats a launch failure as a normal (non-retried) dead letter.

use crate::prelude::Harness;
use serial_test::serial;
use std::time::Duration;

#[test]
#[serial]
fn happy_path_job_completes_within_one_worker() {
    let harness = Harness::new();
    harness.set_config("max_retries", "2");
    harness.set_config("backoff_base", "2");
    harness.enqueue("job-ok", "echo hi");
    harness.start_workers(1);

    let status = harness.wait_for_status(Duration::from_secs(3), |s| s["completed"] == 1);
    assert_eq!(status["pending"], 0);

    harness.stop_workers();
}

#[test]
#[serial]
fn unknown_binary_dies_without_retry() {
    let harness = Harness::new();
    harness.set_config("max_retries", "0");
    harness.enqueue("job-invalid", "not-a-real-command");
    harness.start_workers(1);

    let status = harness.wait_for_status(Duration::from_secs(3), |s| s["dead"] == 1);
    assert_eq!(status["pending"], 0);

    let dead = harness.dlq_list();
    let job = dead.as_array().and_then(|jobs| jobs.iter().find(|j| j["id"] == "job-invalid"));
    let job = job.expect("job-invalid present in dlq list");
    assert!(job["last_error"].as_str().unwrap_or_default().len() > 0);

    harness.stop_workers();
}
