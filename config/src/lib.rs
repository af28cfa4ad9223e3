//! Configuration loading for tddguard.
//!
//! Every field is optional; an absent file or section means built-in defaults.
//! Lookup order is `<project_root>/.tddguard.toml`, then `~/.tddguard/config.toml`.
//! The first file that exists wins; files are not merged.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const PROJECT_CONFIG_FILE: &str = ".tddguard.toml";
pub const STDIN_TIMEOUT_ENV: &str = "TDDGUARD_STDIN_TIMEOUT_MS";

pub const DEFAULT_STDIN_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_STATE_PATH: &str = ".claude/tdd-guard/data/test.json";
pub const DEFAULT_SOURCE_EXTENSION: &str = "go";
pub const DEFAULT_TEST_SUFFIX: &str = "_test";
pub const DEFAULT_BLOCK_EXIT_CODE: u8 = 1;

#[derive(Debug, Default, Deserialize)]
pub struct GuardConfig {
    pub input: Option<InputConfig>,
    pub state: Option<StateConfig>,
    pub colocation: Option<ColocationConfig>,
    pub patterns: Option<PatternsConfig>,
    pub verdict: Option<VerdictConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// Hook payload read limits.
///
/// ```toml
/// [input]
/// timeout_ms = 5000
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct InputConfig {
    pub timeout_ms: Option<u64>,
}

/// Location of the persisted test state. Relative paths resolve against the project root.
///
/// ```toml
/// [state]
/// path = ".claude/tdd-guard/data/test.json"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct StateConfig {
    pub path: Option<PathBuf>,
}

/// Test-file naming convention used by the co-location probe.
///
/// ```toml
/// [colocation]
/// extension = "go"
/// test_suffix = "_test"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct ColocationConfig {
    pub extension: Option<String>,
    pub test_suffix: Option<String>,
}

/// Pattern registry overrides.
///
/// `always_allowed`, `implementation` and `evidence` replace the built-in
/// sets when present. `extra_evidence` and `named_tests` are appended to
/// whichever evidence set is in effect.
///
/// ```toml
/// [patterns]
/// always_allowed = ["**/*_test.go", "**/*.md"]
/// extra_evidence = ['panic: ']
/// named_tests = ["TestDefaultConfig"]
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct PatternsConfig {
    pub always_allowed: Option<Vec<String>>,
    pub implementation: Option<Vec<String>>,
    pub evidence: Option<Vec<String>>,
    #[serde(default)]
    pub extra_evidence: Vec<String>,
    #[serde(default)]
    pub named_tests: Vec<String>,
}

/// ```toml
/// [verdict]
/// block_exit_code = 2
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct VerdictConfig {
    pub block_exit_code: Option<u8>,
}

/// Resolved co-location convention: `<stem><test_suffix>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColocationRule {
    pub extension: String,
    pub test_suffix: String,
}

impl Default for ColocationRule {
    fn default() -> Self {
        Self {
            extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            test_suffix: DEFAULT_TEST_SUFFIX.to_string(),
        }
    }
}

impl ColocationRule {
    /// File-name suffix shared by every test file, e.g. `_test.go`.
    #[must_use]
    pub fn test_file_suffix(&self) -> String {
        format!("{}.{}", self.test_suffix, self.extension)
    }

    /// Human-readable glob, e.g. `*_test.go`.
    #[must_use]
    pub fn test_file_hint(&self) -> String {
        format!("*{}", self.test_file_suffix())
    }
}

impl GuardConfig {
    /// Load the first config file found for `project_root`.
    pub fn load(project_root: Option<&Path>) -> Result<Option<Self>, ConfigError> {
        for path in config_candidates(project_root) {
            if path.exists() {
                return Self::load_from(&path).map(Some);
            }
        }
        Ok(None)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "Loaded config");
                Ok(config)
            }
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    /// Stdin read deadline, honouring [`STDIN_TIMEOUT_ENV`].
    #[must_use]
    pub fn stdin_timeout(&self) -> Duration {
        self.stdin_timeout_with_override(env::var(STDIN_TIMEOUT_ENV).ok().as_deref())
    }

    fn stdin_timeout_with_override(&self, raw: Option<&str>) -> Duration {
        if let Some(raw) = raw {
            match raw.trim().parse::<u64>() {
                Ok(ms) => return Duration::from_millis(ms),
                Err(_) => tracing::warn!(
                    env_var = STDIN_TIMEOUT_ENV,
                    value = raw,
                    "Ignoring unparsable timeout override"
                ),
            }
        }
        self.input
            .as_ref()
            .and_then(|input| input.timeout_ms)
            .map_or(DEFAULT_STDIN_TIMEOUT, Duration::from_millis)
    }

    /// Test-state path, resolved against `project_root` when relative.
    #[must_use]
    pub fn state_path(&self, project_root: &Path) -> PathBuf {
        let configured = self
            .state
            .as_ref()
            .and_then(|state| state.path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_PATH));
        if configured.is_absolute() {
            configured
        } else {
            project_root.join(configured)
        }
    }

    #[must_use]
    pub fn colocation_rule(&self) -> ColocationRule {
        let defaults = ColocationRule::default();
        let Some(cfg) = self.colocation.as_ref() else {
            return defaults;
        };
        ColocationRule {
            extension: cfg
                .extension
                .as_deref()
                .map(|ext| ext.trim_start_matches('.'))
                .filter(|ext| !ext.is_empty())
                .map_or(defaults.extension, str::to_string),
            test_suffix: cfg
                .test_suffix
                .clone()
                .filter(|suffix| !suffix.is_empty())
                .unwrap_or(defaults.test_suffix),
        }
    }

    /// Non-zero exit status for a blocked edit. Zero is rejected because it means "allow".
    #[must_use]
    pub fn block_exit_code(&self) -> u8 {
        match self.verdict.as_ref().and_then(|v| v.block_exit_code) {
            Some(0) => {
                tracing::warn!("block_exit_code = 0 would allow blocked edits; using default");
                DEFAULT_BLOCK_EXIT_CODE
            }
            Some(code) => code,
            None => DEFAULT_BLOCK_EXIT_CODE,
        }
    }

    #[must_use]
    pub fn patterns(&self) -> Option<&PatternsConfig> {
        self.patterns.as_ref()
    }
}

/// Per-user state directory (`~/.tddguard`).
#[must_use]
pub fn tddguard_home() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".tddguard"))
}

fn config_candidates(project_root: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(root) = project_root {
        candidates.push(root.join(PROJECT_CONFIG_FILE));
    }
    if let Some(home) = tddguard_home() {
        candidates.push(home.join("config.toml"));
    }
    candidates
}
