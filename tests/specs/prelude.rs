//! Shared scaffolding: a scratch database plus a thin wrapper over
//! `assert_cmd::Command` for driving `queuectl` the way an operator would.

use assert_cmd::Command;
use serde_json::Value;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tempfile::TempDir;

pub struct Harness {
    _dir: TempDir,
    db: PathBuf,
}

impl Harness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create scratch dir");
        let db = dir.path().join("queue.db");
        Harness { _dir: dir, db }
    }

    pub fn queuectl(&self) -> Command {
        let mut cmd = Command::cargo_bin("queuectl").expect("locate queuectl binary");
        cmd.arg("--db").arg(&self.db);
        cmd
    }

    pub fn enqueue(&self, id: &str, command: &str) {
        let json = serde_json::json!({ "id": id, "command": command }).to_string();
        self.queuectl().args(["enqueue", &json]).assert().success();
    }

    pub fn set_config(&self, key: &str, value: &str) {
        self.queuectl().args(["config", "set", key, value]).assert().success();
    }

    pub fn start_workers(&self, count: u32) {
        self.queuectl()
            .args(["worker", "start", "--count", &count.to_string()])
            .assert()
            .success();
    }

    pub fn stop_workers(&self) {
        self.queuectl().args(["worker", "stop"]).assert().success();
    }

    pub fn status(&self) -> Value {
        let output = self.queuectl().args(["status", "--format", "json"]).output().expect("run status");
        serde_json::from_slice(&output.stdout).expect("parse status json")
    }

    pub fn dlq_list(&self) -> Value {
        let output = self.queuectl().args(["dlq", "list", "--format", "json"]).output().expect("run dlq list");
        serde_json::from_slice(&output.stdout).expect("parse dlq list json")
    }

    /// Poll `status` until `predicate` holds, panicking once `timeout` elapses.
    pub fn wait_for_status(&self, timeout: Duration, mut predicate: impl FnMut(&Value) -> bool) -> Value {
        let deadline = Instant::now() + timeout;
        loop {
            let status = self.status();
            if predicate(&status) {
                return status;
            }
            if Instant::now() >= deadline {
                panic!("condition not met within {timeout:?}, last status: {status}");
            }
            std::thread::sleep(Duration::from_millis(100));
        }
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        // Best-effort: a test that already stopped its workers leaves nothing
        // to signal, and a missing binary during a failed assertion should
        // not itself panic the Drop impl.
        if let Ok(mut cmd) = Command::cargo_bin("queuectl") {
            let _ = cmd.arg("--db").arg(&self.db).args(["worker", "stop"]).output();
        }
    }
}
