//! The hook must terminate even when the assistant never closes stdin.

use std::io::Write;
use std::time::{Duration, Instant};

use crate::common::{Project, stdout};

#[test]
fn open_stdin_times_out_and_allows_with_defaults() {
    let project = Project::new();
    let mut child = project
        .command()
        .env("TDDGUARD_STDIN_TIMEOUT_MS", "300")
        .spawn()
        .unwrap();

    // Send half a payload and keep the pipe open.
    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(br#"{"tool_name":"Edit","tool_in"#).unwrap();
    stdin.flush().unwrap();

    let started = Instant::now();
    let output = child.wait_with_output().unwrap();
    let elapsed = started.elapsed();
    drop(stdin);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "TDD-Guard: Not adding implementation code\n");
    assert!(
        elapsed < Duration::from_secs(5),
        "hook took {elapsed:?} with a 300ms read timeout"
    );
}

#[test]
fn configured_timeout_is_read_from_project_config() {
    let project = Project::new();
    project.write(".tddguard.toml", "[input]\ntimeout_ms = 200\n");
    let mut child = project.command().spawn().unwrap();
    let stdin = child.stdin.take().unwrap();

    let started = Instant::now();
    let output = child.wait_with_output().unwrap();
    let elapsed = started.elapsed();
    drop(stdin);

    assert_eq!(output.status.code(), Some(0));
    assert!(elapsed < Duration::from_secs(5), "hook took {elapsed:?}");
}
