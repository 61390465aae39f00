use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Subprocess invocation events
///
/// Payload and key material are deliberately absent from every variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RunEvent {
    /// Child process spawned
    Started { mode: String },

    /// Child exited zero; stdout length is reported, never its content
    Completed { mode: String, stdout_bytes: u64 },

    /// Child failed (non-zero exit, spawn failure, or signal)
    Failed {
        mode: String,
        failure: FailureContext,
    },
}
