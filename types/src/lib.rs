//! Core domain types for tddguard.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies:
//! the decoded hook payload, the persisted test state, and the verdict.

mod invocation;
mod lenient;
mod test_state;
mod verdict;

// ============================================================================
// Input
// ============================================================================

pub use invocation::{EditOp, HookPayload, Invocation, ToolInput};

// ============================================================================
// Evidence
// ============================================================================

pub use test_state::{RunReason, TestModule, TestRecord, TestState, TestStatus};

// ============================================================================
// Output
// ============================================================================

pub use verdict::{EvidenceReport, Outcome, Verdict};
