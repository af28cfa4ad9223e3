use std::fs;
use std::path::{Path, PathBuf};

use tddguard_config::ColocationRule;

/// True if a test file lives next to the implementation file at `file_path`.
///
/// Looks for the sibling `<stem><test_suffix>.<extension>` first, then for
/// any test file in the same directory. Both checks go by name: any existing
/// entry counts, whatever its file type. Files outside the implementation
/// family (wrong extension, or already a test file) never match. Relative
/// paths resolve against `project_root`; without a root there is no evidence.
#[must_use]
pub fn has_colocated_test(
    file_path: Option<&str>,
    project_root: Option<&Path>,
    rule: &ColocationRule,
) -> bool {
    let (Some(file_path), Some(project_root)) = (file_path, project_root) else {
        return false;
    };
    if file_path.is_empty() {
        return false;
    }

    let target = resolve(project_root, file_path);
    let Some(file_name) = target.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    let source_suffix = format!(".{}", rule.extension);
    let test_file_suffix = rule.test_file_suffix();
    if file_name.ends_with(&test_file_suffix) {
        return false;
    }
    let Some(stem) = file_name.strip_suffix(&source_suffix) else {
        return false;
    };

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let sibling = dir.join(format!("{stem}{test_file_suffix}"));
    if sibling.exists() {
        tracing::debug!(sibling = %sibling.display(), "Found sibling test file");
        return true;
    }

    any_test_file_in(dir, &test_file_suffix)
}

fn resolve(project_root: &Path, file_path: &str) -> PathBuf {
    let path = Path::new(file_path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

fn any_test_file_in(dir: &Path, test_file_suffix: &str) -> bool {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), "Cannot list directory: {e}");
            return false;
        }
    };

    entries.flatten().any(|entry| {
        entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(test_file_suffix))
    })
}
