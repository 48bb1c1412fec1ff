//! Scenario 4 (§8): the SQLite dispatch lock must hold up under real
//! multi-process contention, not just the in-process property tests in
//! `queuectl-storage`.

use crate::prelude::Harness;
use serial_test::serial;
use std::time::Duration;

#[test]
#[serial]
fn hundred_jobs_eight_workers_each_completed_exactly_once() {
    let harness = Harness::new();
    harness.set_config("max_retries", "0");

    for i in 0..100 {
        harness.enqueue(&format!("job-{i}"), "true");
    }
    harness.start_workers(8);

    let status = harness.wait_for_status(Duration::from_secs(30), |s| s["completed"] == 100);
    assert_eq!(status["processing"], 0);
    assert_eq!(status["pending"], 0);
    assert_eq!(status["dead"], 0);

    harness.stop_workers();
}
