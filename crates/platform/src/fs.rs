//! Executable-bit setup for downloaded binaries

use std::path::Path;

use yedctl_errors::{Error, PlatformError};

/// Set the owner-executable permission bits (0o755) on a downloaded binary.
///
/// No-op on Windows, where executability is determined by file extension.
///
/// # Errors
///
/// Returns `PlatformError` when the file metadata cannot be read or the
/// permissions cannot be changed.
#[cfg(unix)]
pub async fn make_executable(path: &Path) -> Result<(), Error> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path)
        .await
        .map_err(|e| PlatformError::FilesystemOperationFailed {
            operation: "metadata".to_string(),
            path: path.display().to_string(),
            message: e.to_string(),
        })?
        .permissions();
    perms.set_mode(0o755);
    tokio::fs::set_permissions(path, perms).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            PlatformError::PermissionDenied {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        } else {
            PlatformError::FilesystemOperationFailed {
                operation: "set_permissions".to_string(),
                path: path.display().to_string(),
                message: e.to_string(),
            }
        }
    })?;
    tracing::debug!(path = %path.display(), "marked binary executable");
    Ok(())
}

#[cfg(not(unix))]
pub async fn make_executable(_path: &Path) -> Result<(), Error> {
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    #[tokio::test]
    async fn sets_owner_executable_bit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yed.linux");
        tokio::fs::write(&path, b"#!/bin/sh\n").await.unwrap();

        make_executable(&path).await.unwrap();

        let mode = tokio::fs::metadata(&path).await.unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = make_executable(&dir.path().join("absent")).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Platform(PlatformError::FilesystemOperationFailed { .. })
        ));
    }
}
