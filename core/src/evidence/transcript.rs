use std::fs;
use std::path::Path;

use crate::patterns::TextRules;

/// True if the conversation transcript mentions a test failure.
///
/// Best-effort: the whole file is scanned as lossy UTF-8 against the
/// evidence rules. Novel failure wording is missed, and failures that are
/// merely discussed still count.
#[must_use]
pub fn has_transcript_evidence(transcript: Option<&Path>, rules: &TextRules) -> bool {
    let Some(path) = transcript else {
        return false;
    };
    if rules.is_empty() {
        return false;
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(path = %path.display(), "Cannot read transcript: {e}");
            return false;
        }
    };

    let text = String::from_utf8_lossy(&bytes);
    match rules.first_match(&text) {
        Some(label) => {
            tracing::debug!(rule = label, "Transcript evidence found");
            true
        }
        None => false,
    }
}
