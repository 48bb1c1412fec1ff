//! Scenario 2 (§8): a job that always fails exhausts its retry budget and
//! lands in the dead letter queue with the expected attempt count.

use crate::prelude::Harness;
use serial_test::serial;
use std::time::Duration;

#[test]
#[serial]
fn always_failing_job_dies_after_exhausting_retries() {
    let harness = Harness::new();
    harness.set_config("max_retries", "2");
    harness.set_config("backoff_base", "2");
    harness.enqueue("job-fail", "false");
    harness.start_workers(1);

    // 2^1 + 2^2 = 6s of backoff before the third and final attempt settles.
    let status = harness.wait_for_status(Duration::from_secs(10), |s| s["dead"] == 1);
    assert_eq!(status["pending"], 0);

    let dead = harness.dlq_list();
    let job = dead
        .as_array()
        .and_then(|jobs| jobs.iter().find(|j| j["id"] == "job-fail"))
        .expect("job-fail present in dlq list");
    assert_eq!(job["attempts"], 3);
    assert_ne!(job["exit_code"], serde_json::json!(0));

    harness.stop_workers();
}
