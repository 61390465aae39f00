//! Platform-specific operation errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Errors that can occur while resolving or preparing the platform binary
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlatformError {
    #[error("unsupported platform: {os}-{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("filesystem operation failed: {operation} on {path}: {message}")]
    FilesystemOperationFailed {
        operation: String,
        path: String,
        message: String,
    },

    #[error("permission denied: {path}: {message}")]
    PermissionDenied { path: String, message: String },
}

impl UserFacingError for PlatformError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedPlatform { .. } => {
                Some("No yed release binary exists for this OS/architecture.")
            }
            Self::PermissionDenied { .. } => {
                Some("Ensure the cache directory is writable by the current user.")
            }
            Self::FilesystemOperationFailed { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::UnsupportedPlatform { .. } => "platform.unsupported",
            Self::FilesystemOperationFailed { .. } => "platform.fs_failed",
            Self::PermissionDenied { .. } => "platform.permission_denied",
        })
    }
}
