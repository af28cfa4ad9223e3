//! Evidence probes.
//!
//! Each probe answers one question about whether tests were written first.
//! Probes are read-only and independent: every I/O or decode failure inside a
//! probe is logged and reported as "no evidence" for that probe alone.

mod colocation;
mod state;
mod transcript;

pub use colocation::has_colocated_test;
pub use state::{has_failing_state, load_test_state};
pub use transcript::has_transcript_evidence;
