//! Subprocess invocation error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProcessError {
    /// The binary ran but reported failure. `stderr` carries whatever
    /// diagnostics the child produced (already trimmed); when the child was
    /// silent the caller falls back to a generic exit-code message.
    #[error("{binary} exited with code {code}: {stderr}")]
    ExitFailure {
        binary: String,
        code: i32,
        stderr: String,
    },

    #[error("failed to spawn {binary}: {message}")]
    SpawnFailed { binary: String, message: String },

    #[error("failed to write to stdin of {binary}: {message}")]
    StdinWriteFailed { binary: String, message: String },

    #[error("{binary} terminated by signal")]
    Terminated { binary: String },
}

impl UserFacingError for ProcessError {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            // Prefer the child's own diagnostics when it produced any.
            Self::ExitFailure { stderr, code, .. } => {
                if stderr.is_empty() {
                    Cow::Owned(format!("yed exited with code {code}"))
                } else {
                    Cow::Borrowed(stderr)
                }
            }
            _ => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::SpawnFailed { .. } => {
                Some("The cached binary may be corrupt; delete it and re-run to refetch.")
            }
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::ExitFailure { .. } => "process.exit_failure",
            Self::SpawnFailed { .. } => "process.spawn_failed",
            Self::StdinWriteFailed { .. } => "process.stdin_write_failed",
            Self::Terminated { .. } => "process.terminated",
        })
    }
}
