//! Scenario 5 (§8): requeuing a dead job grants it a fresh retry budget
//! rather than resuming its exhausted attempt count.

use crate::prelude::Harness;
use serial_test::serial;
use std::time::Duration;

#[test]
#[serial]
fn requeue_resets_attempts_and_the_job_can_die_again() {
    let harness = Harness::new();
    harness.set_config("max_retries", "2");
    harness.set_config("backoff_base", "2");
    harness.enqueue("job-fail", "false");
    harness.start_workers(1);
    harness.wait_for_status(Duration::from_secs(10), |s| s["dead"] == 1);
    harness.stop_workers();

    harness.queuectl().args(["dlq", "retry", "job-fail"]).assert().success();
    let status = harness.status();
    assert_eq!(status["pending"], 1);
    assert_eq!(status["dead"], 0);

    harness.start_workers(1);
    let status = harness.wait_for_status(Duration::from_secs(10), |s| s["dead"] == 1);
    assert_eq!(status["pending"], 0);

    let dead = harness.dlq_list();
    let job = dead
        .as_array()
        .and_then(|jobs| jobs.iter().find(|j| j["id"] == "job-fail"))
        .expect("job-fail present in dlq list");
    assert_eq!(job["attempts"], 3);

    harness.stop_workers();
}
