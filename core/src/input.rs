//! Bounded read of the hook payload.
//!
//! The assistant writes one JSON document to the hook's stdin and closes it.
//! A misbehaving pipe must not hang the gate, so the read races a deadline;
//! losing that race, a read error, or undecodable bytes all yield the empty
//! [`Invocation`].

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};

use tddguard_types::{HookPayload, Invocation};

/// Read `reader` to EOF within `timeout` and decode the payload.
pub async fn read_invocation<R>(mut reader: R, timeout: Duration) -> Invocation
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let result = tokio::time::timeout(timeout, reader.read_to_end(&mut buf)).await;

    match result {
        Ok(Ok(_)) => decode_invocation(&buf),
        Ok(Err(e)) => {
            tracing::warn!("Failed to read hook payload: {e}");
            Invocation::default()
        }
        Err(_) => {
            tracing::warn!(
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                buffered = buf.len(),
                "Hook payload not complete before deadline; using defaults"
            );
            Invocation::default()
        }
    }
}

/// Decode a complete payload. Malformed input yields the empty invocation.
#[must_use]
pub fn decode_invocation(bytes: &[u8]) -> Invocation {
    match serde_json::from_slice::<HookPayload>(bytes) {
        Ok(payload) => Invocation::from(payload),
        Err(e) => {
            tracing::warn!(bytes = bytes.len(), "Malformed hook payload: {e}");
            Invocation::default()
        }
    }
}
