//! Scenario 6 (§8): `worker stop` lets an in-flight job finish before the
//! worker process exits, instead of killing it mid-execution.

use crate::prelude::Harness;
use serial_test::serial;
use std::thread;
use std::time::Duration;

#[test]
#[serial]
fn worker_stop_drains_the_in_flight_job_before_exiting() {
    let harness = Harness::new();
    harness.enqueue("job-slow", "sleep 5");
    harness.start_workers(1);

    thread::sleep(Duration::from_secs(1));
    harness.stop_workers();

    let status = harness.wait_for_status(Duration::from_secs(8), |s| s["completed"] == 1);
    assert_eq!(status["active_workers"], 0);
}
