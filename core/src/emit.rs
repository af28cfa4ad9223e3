//! Verdict emitter: message channel and exit status.
//!
//! Allowed edits get an advisory line on stdout and status 0. Blocked edits
//! get the full justification on stderr and the configured non-zero status.

use std::io::Write;

use tddguard_types::Verdict;

pub const ALLOW_EXIT_CODE: u8 = 0;
pub const ADVISORY_PREFIX: &str = "TDD-Guard: ";

/// Write the verdict's justification to the matching channel and return the exit status.
///
/// Write failures are logged and otherwise ignored; the exit status alone
/// still carries the decision.
pub fn emit<O, E>(verdict: &Verdict, block_exit_code: u8, stdout: &mut O, stderr: &mut E) -> u8
where
    O: Write + ?Sized,
    E: Write + ?Sized,
{
    if verdict.allow {
        if let Err(e) = writeln!(stdout, "{ADVISORY_PREFIX}{}", verdict.justification)
            .and_then(|()| stdout.flush())
        {
            tracing::warn!("Failed to write advisory message: {e}");
        }
        ALLOW_EXIT_CODE
    } else {
        if let Err(e) =
            writeln!(stderr, "{}", verdict.justification).and_then(|()| stderr.flush())
        {
            tracing::warn!("Failed to write block message: {e}");
        }
        block_exit_code
    }
}
