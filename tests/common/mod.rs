//! Shared test utilities and fixtures
//!
//! Runs the built `tddguard` binary inside a throwaway project directory with
//! `HOME` pointed at the same directory, so user config and logs never leak in.

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::{Value, json};
use tempfile::TempDir;

pub const STRUCT_EDIT: &str = "type Server struct {\n\taddr string\n}\n";

pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tddguard"));
        cmd.current_dir(self.root())
            .env("HOME", self.root())
            .env_remove("RUST_LOG")
            .env_remove("TDDGUARD_STDIN_TIMEOUT_MS")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    /// Run the hook with `stdin` as the complete payload.
    pub fn run(&self, stdin: &[u8]) -> Output {
        feed(self.command(), stdin)
    }

    pub fn run_json(&self, payload: &Value) -> Output {
        self.run(payload.to_string().as_bytes())
    }
}

/// Spawn `cmd`, write `stdin` and close it, then collect the output.
pub fn feed(mut cmd: Command, stdin: &[u8]) -> Output {
    let mut child = cmd.spawn().unwrap();
    child.stdin.take().unwrap().write_all(stdin).unwrap();
    child.wait_with_output().unwrap()
}

pub fn edit_payload(file_path: &str, new_string: &str) -> Value {
    json!({
        "session_id": "test-session",
        "hook_event_name": "PreToolUse",
        "tool_name": "Edit",
        "tool_input": {
            "file_path": file_path,
            "old_string": "",
            "new_string": new_string
        }
    })
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
