//! Last known test-run outcome, as persisted by the test-runner integration.
//!
//! ```json
//! {
//!   "testModules": [
//!     { "moduleId": "pkg/server", "tests": [ { "name": "TestServe", "status": "failed" } ] }
//!   ],
//!   "reason": "failed"
//! }
//! ```

use serde::Deserialize;

use crate::lenient;

/// Why the last test run ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunReason {
    Passed,
    Failed,
    Interrupted,
    #[default]
    Unknown,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
    BuildFailed,
    Skipped,
    #[default]
    #[serde(other)]
    Other,
}

impl TestStatus {
    /// `failed` and `build_failed` both count as a red test.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::BuildFailed)
    }
}

/// One test result. The integration writes `status`; some versions write `state`.
///
/// Only the status fields are decoded; names and other metadata are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TestRecord {
    #[serde(deserialize_with = "lenient::or_default")]
    pub status: Option<TestStatus>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub state: Option<TestStatus>,
}

impl TestRecord {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        [self.status, self.state]
            .into_iter()
            .flatten()
            .any(TestStatus::is_failure)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TestModule {
    #[serde(deserialize_with = "lenient::seq")]
    pub tests: Vec<TestRecord>,
}

/// Read-only snapshot of the externally owned test state.
///
/// Decoding is field-by-field tolerant: a malformed `testModules` entry is
/// dropped without losing `reason` or the other entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestState {
    #[serde(deserialize_with = "lenient::or_default")]
    pub reason: RunReason,
    #[serde(deserialize_with = "lenient::seq")]
    pub test_modules: Vec<TestModule>,
}

impl TestState {
    /// True if the run failed or any recorded test is red.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.reason == RunReason::Failed
            || self
                .test_modules
                .iter()
                .flat_map(|module| module.tests.iter())
                .any(TestRecord::is_failure)
    }
}
