//! Decision logic for tddguard.
//!
//! Pipeline: [`read_invocation`] → [`Gate::decide`] (consulting the
//! [`PatternRegistry`] and, for implementation edits, the [`evidence`]
//! probes) → [`emit`].

pub mod emit;
pub mod evidence;
pub mod gate;
pub mod input;
pub mod patterns;

pub use emit::{ADVISORY_PREFIX, ALLOW_EXIT_CODE, emit};
pub use gate::{Gate, GateSettings};
pub use input::{decode_invocation, read_invocation};
pub use patterns::{PathRules, PatternError, PatternRegistry, TextRules};
