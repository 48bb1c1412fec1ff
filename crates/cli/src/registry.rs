// SPDX-License-Identifier: MIT

//! Worker-fleet supervisor: spawn detached `queuectl-worker` processes and
//! track them through an on-disk PID registry (§3, §4.4).
//!
//! The registry is advisory, not authoritative: the OS process table is the
//! source of truth. A registry entry pointing at a dead process is tolerated
//! by [`stop_all`] as a success, and a worker that starts between `stop`'s
//! enumeration and its unlink is not a correctness bug (§4.4).

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

const REGISTRY_DIR_NAME: &str = "queuectl_pids";

fn registry_dir() -> PathBuf {
    std::env::temp_dir().join(REGISTRY_DIR_NAME)
}

fn pid_file(pid: u32) -> PathBuf {
    registry_dir().join(pid.to_string())
}

/// Record a worker's presence. Content is informational only (§3).
fn record(pid: u32, started_at_ms: i64) -> io::Result<()> {
    fs::create_dir_all(registry_dir())?;
    fs::write(pid_file(pid), format!("started_at_ms={started_at_ms}\n"))
}

/// Enumerate registered PIDs. An absent directory means no workers.
pub fn list() -> io::Result<Vec<u32>> {
    let dir = registry_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut pids = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        if let Some(pid) = entry.file_name().to_str().and_then(|s| s.parse::<u32>().ok()) {
            pids.push(pid);
        }
    }
    pids.sort_unstable();
    Ok(pids)
}

fn unlink(pid: u32) -> io::Result<()> {
    match fs::remove_file(pid_file(pid)) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

/// Resolve the `queuectl-worker` binary as a sibling of the running
/// `queuectl` executable, falling back to a bare `PATH` lookup.
fn worker_binary_path() -> PathBuf {
    let name = if cfg!(windows) { "queuectl-worker.exe" } else { "queuectl-worker" };
    if let Ok(current_exe) = std::env::current_exe() {
        if let Some(dir) = current_exe.parent() {
            let sibling = dir.join(name);
            if sibling.exists() {
                return sibling;
            }
        }
    }
    PathBuf::from(name)
}

/// Spawn one detached worker against `db`, returning its PID once the
/// registry entry has been written.
pub fn spawn_worker(db: &std::path::Path, now_ms: i64) -> io::Result<u32> {
    let mut command = Command::new(worker_binary_path());
    command.arg("--db").arg(db).stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // New process group: the worker outlives the CLI invocation and is
        // not in the terminal's foreground group, so it does not receive a
        // Ctrl+C meant for the parent.
        command.process_group(0);
    }

    let child = command.spawn()?;
    let pid = child.id();
    record(pid, now_ms)?;
    Ok(pid)
}

#[cfg(unix)]
fn send_terminate(pid: u32) -> io::Result<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;
    match kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
        Ok(()) => Ok(()),
        Err(nix::errno::Errno::ESRCH) => Ok(()), // no such process: already gone
        Err(err) => Err(io::Error::from_raw_os_error(err as i32)),
    }
}

#[cfg(not(unix))]
fn send_terminate(_pid: u32) -> io::Result<()> {
    Ok(())
}

/// Signal every registered worker for graceful shutdown and unlink its
/// entry, regardless of whether the process was still alive (§4.4, §7).
pub fn stop_all() -> io::Result<usize> {
    let pids = list()?;
    for pid in &pids {
        send_terminate(*pid)?;
        unlink(*pid)?;
    }
    Ok(pids.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_on_missing_directory_is_empty() {
        let dir = registry_dir();
        let _ = fs::remove_dir_all(&dir);
        assert!(list().unwrap().is_empty());
    }
}
