//! Gate output: the terminal state reached and the message shown to the caller.

use std::fmt;

/// Terminal state of a single gate decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Target path is a test, doc, or config file.
    AllowedByPath,
    /// The edit adds no production code, so TDD sequencing does not apply.
    NotImplementation,
    AllowedByState,
    AllowedByColocation,
    AllowedByTranscript,
    Blocked,
    /// The gate itself faulted; the edit is let through.
    FailOpen,
}

impl Outcome {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        !matches!(self, Self::Blocked)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllowedByPath => "allowed_by_path",
            Self::NotImplementation => "not_implementation",
            Self::AllowedByState => "allowed_by_state",
            Self::AllowedByColocation => "allowed_by_colocation",
            Self::AllowedByTranscript => "allowed_by_transcript",
            Self::Blocked => "blocked",
            Self::FailOpen => "fail_open",
        }
    }

    /// One-line justification for the allowing states.
    const fn summary(self) -> &'static str {
        match self {
            Self::AllowedByPath => "File type always allowed (test/doc/config)",
            Self::NotImplementation => "Not adding implementation code",
            Self::AllowedByState => "Failing tests found in test state",
            Self::AllowedByColocation => "Corresponding test file exists",
            Self::AllowedByTranscript => "Test evidence found in conversation",
            Self::Blocked => "TDD violation: Adding implementation without test evidence.",
            Self::FailOpen => "Error occurred, allowing operation",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What each evidence probe returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvidenceReport {
    pub failing_state: bool,
    pub colocated_test: bool,
    pub transcript_evidence: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub allow: bool,
    pub outcome: Outcome,
    pub justification: String,
    /// Probe results, present only when the probes were consulted to block.
    pub evidence: Option<EvidenceReport>,
}

impl Verdict {
    /// Verdict for any allowing state other than [`Outcome::FailOpen`].
    ///
    /// # Panics
    ///
    /// Debug builds assert that `outcome` is not [`Outcome::Blocked`].
    #[must_use]
    pub fn allowed(outcome: Outcome) -> Self {
        debug_assert!(outcome.is_allowed(), "use Verdict::blocked");
        Self {
            allow: true,
            outcome,
            justification: outcome.summary().to_string(),
            evidence: None,
        }
    }

    /// Blocking verdict enumerating what was checked so the caller can self-correct.
    ///
    /// `test_file_hint` names the test-file convention, e.g. `*_test.go`.
    #[must_use]
    pub fn blocked(evidence: EvidenceReport, test_file_hint: &str) -> Self {
        let yes_no = |found: bool, yes: &'static str, no: &'static str| if found { yes } else { no };
        let justification = format!(
            "{summary}\n\
             \n\
             To fix this:\n\
             1. Write a failing test first (in a {test_file_hint} file)\n\
             2. Run the test: make test\n\
             3. Then implement the code\n\
             \n\
             Evidence checked:\n\
             - Test state file: {state} failing tests\n\
             - Test file exists: {colocated}\n\
             - Conversation evidence: {transcript}",
            summary = Outcome::Blocked.summary(),
            state = yes_no(evidence.failing_state, "HAS", "NO"),
            colocated = yes_no(evidence.colocated_test, "YES", "NO"),
            transcript = yes_no(evidence.transcript_evidence, "FOUND", "NOT FOUND"),
        );
        Self {
            allow: false,
            outcome: Outcome::Blocked,
            justification,
            evidence: Some(evidence),
        }
    }

    /// Allow verdict produced when the pipeline itself faulted.
    #[must_use]
    pub fn fail_open(detail: impl fmt::Display) -> Self {
        Self {
            allow: true,
            outcome: Outcome::FailOpen,
            justification: format!("{} - {detail}", Outcome::FailOpen.summary()),
            evidence: None,
        }
    }
}
