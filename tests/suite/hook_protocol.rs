//! End-to-end runs of the hook binary: payload in, message + exit status out.

use serde_json::json;

use crate::common::{Project, STRUCT_EDIT, edit_payload, stderr, stdout};

#[test]
fn documentation_edit_is_allowed_on_stdout() {
    let project = Project::new();
    let output = project.run_json(&edit_payload("docs/README.md", STRUCT_EDIT));

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        "TDD-Guard: File type always allowed (test/doc/config)\n"
    );
    assert!(stderr(&output).is_empty());
}

#[test]
fn implementation_without_evidence_is_blocked_on_stderr() {
    let project = Project::new();
    let output = project.run_json(&edit_payload("pkg/server.go", STRUCT_EDIT));

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    let message = stderr(&output);
    assert!(message.starts_with("TDD violation: Adding implementation without test evidence."));
    assert!(message.contains("- Test state file: NO failing tests"));
    assert!(message.contains("- Test file exists: NO"));
    assert!(message.contains("- Conversation evidence: NOT FOUND"));
}

#[test]
fn failing_test_state_allows_implementation() {
    let project = Project::new();
    project.write(
        ".claude/tdd-guard/data/test.json",
        r#"{"testModules":[{"moduleId":"pkg","tests":[{"name":"TestServe","status":"failed"}]}],"reason":"failed"}"#,
    );
    let output = project.run_json(&edit_payload("pkg/server.go", STRUCT_EDIT));

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "TDD-Guard: Failing tests found in test state\n");
}

#[test]
fn failed_reason_with_null_modules_allows_implementation() {
    let project = Project::new();
    project.write(
        ".claude/tdd-guard/data/test.json",
        r#"{"reason":"failed","testModules":null}"#,
    );
    let output = project.run_json(&edit_payload("pkg/server.go", STRUCT_EDIT));

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "TDD-Guard: Failing tests found in test state\n");
}

#[test]
fn null_edits_field_does_not_bypass_the_gate() {
    let project = Project::new();
    let mut payload = edit_payload("pkg/server.go", STRUCT_EDIT);
    payload["tool_input"]["edits"] = serde_json::Value::Null;
    let output = project.run_json(&payload);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("TDD violation"));
}

#[test]
fn sibling_test_file_allows_implementation() {
    let project = Project::new();
    project.write("pkg/server_test.go", "package pkg\n");
    let output = project.run_json(&edit_payload("pkg/server.go", STRUCT_EDIT));

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "TDD-Guard: Corresponding test file exists\n");
}

#[test]
fn transcript_evidence_allows_multi_edit() {
    let project = Project::new();
    let transcript = project.write(
        "session.jsonl",
        "{\"type\":\"tool_result\",\"content\":\"--- FAIL: TestServe (0.00s)\"}\n",
    );
    let payload = json!({
        "tool_name": "MultiEdit",
        "transcript_path": transcript,
        "tool_input": {
            "file_path": "pkg/server.go",
            "edits": [
                { "old_string": "a", "new_string": "func NewServer() *Server {" }
            ]
        }
    });
    let output = project.run_json(&payload);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "TDD-Guard: Test evidence found in conversation\n");
}

#[test]
fn malformed_payload_degrades_to_allow() {
    let project = Project::new();
    let output = project.run(b"this is not json");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "TDD-Guard: Not adding implementation code\n");
}

#[test]
fn empty_payload_degrades_to_allow() {
    let project = Project::new();
    let output = project.run(b"");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "TDD-Guard: Not adding implementation code\n");
}

#[test]
fn project_config_sets_block_exit_code_and_named_tests() {
    let project = Project::new();
    project.write(
        ".tddguard.toml",
        "[verdict]\nblock_exit_code = 2\n\n[patterns]\nevidence = []\nnamed_tests = [\"TestBatchJobsTableExists\"]\n",
    );

    let blocked = project.run_json(&edit_payload("pkg/jobs.go", STRUCT_EDIT));
    assert_eq!(blocked.status.code(), Some(2));

    let transcript = project.write("t.jsonl", "ran TestBatchJobsTableExists\n");
    let mut payload = edit_payload("pkg/jobs.go", STRUCT_EDIT);
    payload["transcript_path"] = json!(transcript);
    let allowed = project.run_json(&payload);
    assert_eq!(allowed.status.code(), Some(0));
    assert_eq!(stdout(&allowed), "TDD-Guard: Test evidence found in conversation\n");
}

#[test]
fn broken_config_falls_back_to_defaults() {
    let project = Project::new();
    project.write(".tddguard.toml", "[verdict\nblock_exit_code = ");
    let output = project.run_json(&edit_payload("pkg/server.go", STRUCT_EDIT));

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("TDD violation"));
}

#[test]
fn invalid_configured_pattern_falls_back_to_defaults() {
    let project = Project::new();
    project.write(".tddguard.toml", "[patterns]\nalways_allowed = ['a[']\n");
    let output = project.run_json(&edit_payload("README.md", STRUCT_EDIT));

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        "TDD-Guard: File type always allowed (test/doc/config)\n"
    );
}

#[test]
fn identical_inputs_give_identical_results() {
    let project = Project::new();
    let payload = edit_payload("pkg/server.go", STRUCT_EDIT);
    let first = project.run_json(&payload);
    let second = project.run_json(&payload);

    assert_eq!(first.status.code(), second.status.code());
    assert_eq!(first.stdout, second.stdout);
    assert_eq!(first.stderr, second.stderr);
}
