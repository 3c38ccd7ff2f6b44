mod common;

use std::process::Stdio;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

#[test]
fn guarded_child_is_killed_when_stdin_closes() -> Result<()> {
    let mut guard = common::guarded_command("sleep")
        .arg("30")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("failed to spawn guarded sleep")?;

    std::thread::sleep(Duration::from_millis(200));
    assert!(guard.try_wait()?.is_none(), "guard exited before its stdin closed");

    // The shell only exits after waiting on the killed child
    drop(guard.stdin.take());
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if guard.try_wait()?.is_some() {
            return Ok(());
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    guard.kill()?;
    anyhow::bail!("guarded child survived its stdin closing")
}
