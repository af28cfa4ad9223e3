//! Pattern registry: the three classification rule sets.
//!
//! - **always allowed**: glob patterns over the target path (tests, docs, config).
//! - **implementation**: regexes that flag production code in the proposed content.
//! - **evidence**: regexes that flag test failures in the transcript.
//!
//! The registry is built once at startup and shared by reference; nothing
//! mutates it afterwards.

use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::RegexSet;
use thiserror::Error;

use tddguard_config::PatternsConfig;

/// Default always-allowed path globs.
///
/// Each tuple: `(glob, human_readable_reason)`
pub const DEFAULT_ALWAYS_ALLOWED: &[(&str, &str)] = &[
    ("**/*_test.go", "Test file"),
    ("**/*.md", "Documentation"),
    ("**/*test.json", "Test state data"),
    ("**/.claude/**", "Assistant configuration"),
    ("**/hooks/**", "Hook file"),
];

/// Default production-code signatures. Multi-line mode so `^` anchors each line.
pub const DEFAULT_IMPLEMENTATION: &[(&str, &str)] = &[
    (r"(?m)^type\s+\w+\s+struct", "Struct declaration"),
    (r"(?m)^func\s+[A-Z]\w*\(", "Exported function"),
    (r"(?m)^func\s+\([^)]+\)\s+[A-Z]\w*\(", "Exported method"),
];

/// Default test-failure signatures searched for in the transcript.
///
/// Project-specific test names are not hard-coded here; see `named_tests`
/// in the `[patterns]` config section.
pub const DEFAULT_EVIDENCE: &[(&str, &str)] = &[
    (r"(?i)undefined:\s*\w+", "Compile error"),
    (r"(?i)FAIL\s+.*\[build failed\]", "Build failure"),
    (r"(?i)--- FAIL:", "Test failure"),
    (r"(?i)Error:.*expected.*got", "Assertion failure"),
    (r"(?i)test.*fail", "Generic test failure"),
];

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid always-allowed pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        source: globset::Error,
    },
    #[error("failed to compile {set} patterns: {source}")]
    Regex {
        set: &'static str,
        source: regex::Error,
    },
}

/// Path rules compiled into a single [`GlobSet`].
#[derive(Debug, Clone)]
pub struct PathRules {
    set: GlobSet,
    labels: Vec<String>,
}

impl PathRules {
    pub fn new<'a>(
        patterns: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, PatternError> {
        let mut builder = GlobSetBuilder::new();
        let mut globs = Vec::new();
        let mut labels = Vec::new();
        for (pattern, label) in patterns {
            let glob = Glob::new(pattern).map_err(|e| PatternError::Glob {
                pattern: pattern.to_string(),
                source: e,
            })?;
            builder.add(glob);
            globs.push(pattern);
            labels.push(label.to_string());
        }
        let set = builder.build().map_err(|e| PatternError::Glob {
            pattern: globs.join(", "),
            source: e,
        })?;
        Ok(Self { set, labels })
    }

    /// Label of the first rule matching `path`. `\` separators are treated as `/`.
    #[must_use]
    pub fn first_match(&self, path: &str) -> Option<&str> {
        if path.is_empty() {
            return None;
        }
        let normalized = path.replace('\\', "/");
        self.set
            .matches(normalized.as_str())
            .first()
            .map(|&idx| self.labels[idx].as_str())
    }
}

/// Text rules compiled into a single [`RegexSet`] for one-pass matching.
#[derive(Debug, Clone)]
pub struct TextRules {
    regex_set: RegexSet,
    /// Human-readable labels, parallel to the `regex_set` patterns.
    labels: Vec<String>,
}

impl TextRules {
    pub fn new<'a>(
        set: &'static str,
        patterns: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, PatternError> {
        let (pattern_strs, labels): (Vec<&str>, Vec<String>) = patterns
            .into_iter()
            .map(|(pattern, label)| (pattern, label.to_string()))
            .unzip();
        let regex_set =
            RegexSet::new(&pattern_strs).map_err(|e| PatternError::Regex { set, source: e })?;
        Ok(Self { regex_set, labels })
    }

    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex_set.is_match(text)
    }

    /// Label of the lowest-indexed rule matching `text`.
    #[must_use]
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.regex_set
            .matches(text)
            .iter()
            .next()
            .map(|idx| self.labels[idx].as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Immutable classification rules consulted by the gate.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    always_allowed: PathRules,
    implementation: TextRules,
    evidence: TextRules,
}

impl PatternRegistry {
    /// Registry with the built-in rule sets.
    pub fn with_defaults() -> Result<Self, PatternError> {
        Self::from_config(None)
    }

    /// Built-in rule sets with any `[patterns]` overrides applied.
    pub fn from_config(config: Option<&PatternsConfig>) -> Result<Self, PatternError> {
        let always_allowed = match config.and_then(|c| c.always_allowed.as_deref()) {
            Some(custom) => PathRules::new(custom.iter().map(|p| (p.as_str(), "Configured")))?,
            None => PathRules::new(DEFAULT_ALWAYS_ALLOWED.iter().copied())?,
        };

        let implementation = match config.and_then(|c| c.implementation.as_deref()) {
            Some(custom) => TextRules::new(
                "implementation",
                custom.iter().map(|p| (p.as_str(), "Configured")),
            )?,
            None => TextRules::new("implementation", DEFAULT_IMPLEMENTATION.iter().copied())?,
        };

        let evidence = evidence_rules(config)?;

        Ok(Self {
            always_allowed,
            implementation,
            evidence,
        })
    }

    /// True if `path` is exempt from scrutiny. Absent or empty paths never are.
    #[must_use]
    pub fn is_always_allowed(&self, path: Option<&str>) -> bool {
        path.and_then(|p| self.always_allowed.first_match(p))
            .inspect(|label| tracing::debug!(rule = label, "Path is always allowed"))
            .is_some()
    }

    /// True if `content` looks like production code. Absent or empty content never does.
    #[must_use]
    pub fn is_implementation(&self, content: Option<&str>) -> bool {
        content
            .filter(|c| !c.is_empty())
            .is_some_and(|c| self.implementation.is_match(c))
    }

    #[must_use]
    pub fn evidence(&self) -> &TextRules {
        &self.evidence
    }
}

fn evidence_rules(config: Option<&PatternsConfig>) -> Result<TextRules, PatternError> {
    let mut patterns: Vec<(String, String)> = match config.and_then(|c| c.evidence.as_deref()) {
        Some(custom) => custom
            .iter()
            .map(|p| (p.clone(), "Configured".to_string()))
            .collect(),
        None => DEFAULT_EVIDENCE
            .iter()
            .map(|(p, label)| ((*p).to_string(), (*label).to_string()))
            .collect(),
    };

    if let Some(config) = config {
        patterns.extend(
            config
                .extra_evidence
                .iter()
                .map(|p| (p.clone(), "Configured".to_string())),
        );
        patterns.extend(
            config
                .named_tests
                .iter()
                .filter(|name| !name.trim().is_empty())
                .map(|name| {
                    (
                        named_test_pattern(name.trim()),
                        format!("Named test {}", name.trim()),
                    )
                }),
        );
    }

    TextRules::new(
        "evidence",
        patterns.iter().map(|(p, label)| (p.as_str(), label.as_str())),
    )
}

/// Case-insensitive whole-word marker for a test name.
fn named_test_pattern(name: &str) -> String {
    format!(r"(?i)\b{}\b", regex::escape(name))
}
