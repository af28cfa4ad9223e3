//! Decision engine.
//!
//! ```text
//! always allowed path? ── yes ─► AllowedByPath
//!        │ no
//! implementation code? ── no ──► NotImplementation
//!        │ yes
//! failing test state?  ── yes ─► AllowedByState
//! co-located test?     ── yes ─► AllowedByColocation
//! transcript evidence? ── yes ─► AllowedByTranscript
//!        │ no
//!        ▼
//!     Blocked
//! ```
//!
//! The first matching rule wins and later checks are skipped.

use std::path::PathBuf;

use tddguard_config::{ColocationRule, GuardConfig};
use tddguard_types::{EvidenceReport, Invocation, Outcome, Verdict};

use crate::evidence::{has_colocated_test, has_failing_state, has_transcript_evidence};
use crate::patterns::PatternRegistry;

/// Per-run inputs of the evidence probes that do not come from the payload.
#[derive(Debug, Clone)]
pub struct GateSettings {
    /// Directory the hook runs in; `None` when it could not be determined.
    pub project_root: Option<PathBuf>,
    /// Resolved test-state path; `None` without a project root.
    pub state_path: Option<PathBuf>,
    pub colocation: ColocationRule,
}

impl GateSettings {
    #[must_use]
    pub fn new(config: &GuardConfig, project_root: Option<PathBuf>) -> Self {
        let state_path = project_root.as_deref().map(|root| config.state_path(root));
        Self {
            project_root,
            state_path,
            colocation: config.colocation_rule(),
        }
    }
}

/// Stateless evaluator: the same invocation against the same filesystem
/// snapshot always produces the same verdict.
#[derive(Debug, Clone, Copy)]
pub struct Gate<'a> {
    registry: &'a PatternRegistry,
    settings: &'a GateSettings,
}

impl<'a> Gate<'a> {
    #[must_use]
    pub fn new(registry: &'a PatternRegistry, settings: &'a GateSettings) -> Self {
        Self { registry, settings }
    }

    #[must_use]
    pub fn decide(&self, invocation: &Invocation) -> Verdict {
        let verdict = self.evaluate(invocation);
        tracing::info!(
            tool = %invocation.tool_name,
            path = invocation.file_path().unwrap_or("<none>"),
            outcome = %verdict.outcome,
            "Gate decision"
        );
        verdict
    }

    fn evaluate(&self, invocation: &Invocation) -> Verdict {
        if self.registry.is_always_allowed(invocation.file_path()) {
            return Verdict::allowed(Outcome::AllowedByPath);
        }

        if !self
            .registry
            .is_implementation(invocation.proposed_content())
        {
            return Verdict::allowed(Outcome::NotImplementation);
        }

        let mut report = EvidenceReport::default();

        report.failing_state = self.probe_state();
        if report.failing_state {
            return Verdict::allowed(Outcome::AllowedByState);
        }

        report.colocated_test = self.probe_colocation(invocation);
        if report.colocated_test {
            return Verdict::allowed(Outcome::AllowedByColocation);
        }

        report.transcript_evidence = self.probe_transcript(invocation);
        if report.transcript_evidence {
            return Verdict::allowed(Outcome::AllowedByTranscript);
        }

        Verdict::blocked(report, &self.settings.colocation.test_file_hint())
    }

    fn probe_state(&self) -> bool {
        let found = self
            .settings
            .state_path
            .as_deref()
            .is_some_and(has_failing_state);
        tracing::debug!(probe = "state", found, "Evidence probe");
        found
    }

    fn probe_colocation(&self, invocation: &Invocation) -> bool {
        let found = has_colocated_test(
            invocation.file_path(),
            self.settings.project_root.as_deref(),
            &self.settings.colocation,
        );
        tracing::debug!(probe = "colocation", found, "Evidence probe");
        found
    }

    fn probe_transcript(&self, invocation: &Invocation) -> bool {
        let found = has_transcript_evidence(
            invocation.transcript_path.as_deref(),
            self.registry.evidence(),
        );
        tracing::debug!(probe = "transcript", found, "Evidence probe");
        found
    }
}
