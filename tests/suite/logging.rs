//! The hook's only filesystem writes are its own log under `$HOME`.

use std::fs;

use crate::common::{Project, STRUCT_EDIT, edit_payload, feed, stderr};

#[test]
fn unusable_home_leaves_the_project_untouched() {
    let project = Project::new();
    let not_a_dir = project.write("home-is-a-file", "");
    let payload = edit_payload("pkg/server.go", STRUCT_EDIT);

    let mut cmd = project.command();
    cmd.env("HOME", &not_a_dir);
    let output = feed(cmd, payload.to_string().as_bytes());

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("TDD violation"));
    assert!(!project.root().join(".tddguard").exists());
}

#[test]
fn routine_decisions_are_not_logged_by_default() {
    let project = Project::new();
    project.run_json(&edit_payload("README.md", STRUCT_EDIT));

    let log = project.root().join(".tddguard/logs/tddguard.log");
    let contents = fs::read_to_string(&log).unwrap_or_default();
    assert!(!contents.contains("Gate decision"), "{contents}");
}

#[test]
fn rust_log_widens_the_filter() {
    let project = Project::new();
    let payload = edit_payload("README.md", STRUCT_EDIT);

    let mut cmd = project.command();
    cmd.env("RUST_LOG", "info");
    let output = feed(cmd, payload.to_string().as_bytes());
    assert_eq!(output.status.code(), Some(0));

    let log = fs::read_to_string(project.root().join(".tddguard/logs/tddguard.log")).unwrap();
    assert!(log.contains("Gate decision"), "{log}");
    assert!(log.contains("allowed_by_path"), "{log}");
}
