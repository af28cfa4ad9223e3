use std::fs;
use std::io;
use std::path::Path;

use tddguard_types::TestState;

/// Load the persisted test state, degrading to [`TestState::default`] when
/// the file is missing, unreadable, or malformed.
#[must_use]
pub fn load_test_state(path: &Path) -> TestState {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No test state file");
            return TestState::default();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "Failed to read test state: {e}");
            return TestState::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(path = %path.display(), "Malformed test state: {e}");
            TestState::default()
        }
    }
}

/// True if the persisted state records a failed run or any red test.
#[must_use]
pub fn has_failing_state(path: &Path) -> bool {
    load_test_state(path).has_failures()
}
