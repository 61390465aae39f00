#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Versioned binary cache for yedctl
//!
//! One immutable file per (version, asset) pair, laid out as
//! `{root}/{version}/{asset}`. Paths are a pure function of their inputs;
//! there is no index to maintain and no invalidation logic - a new version
//! is simply a new directory. Nothing here ever deletes an entry.

use std::path::{Path, PathBuf};

use yedctl_errors::{ConfigError, Error};

/// Deterministic path layout over a configurable cache root.
#[derive(Debug, Clone)]
pub struct BinaryCache {
    root: PathBuf,
}

impl BinaryCache {
    /// Create a cache over an explicit root directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a cache over the per-user application-data default,
    /// `{data_dir}/yedctl/bin`.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform has no user data directory.
    pub fn with_default_root() -> Result<Self, Error> {
        let data_dir = dirs::data_dir().ok_or_else(|| ConfigError::NotFound {
            path: "user data directory".to_string(),
        })?;
        Ok(Self::new(data_dir.join("yedctl").join("bin")))
    }

    /// The cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Compute the cache path for a (version, asset) pair.
    ///
    /// Pure join, no filesystem access. Repeated calls with identical inputs
    /// yield identical paths; distinct versions yield distinct paths.
    #[must_use]
    pub fn binary_path(&self, version: &str, asset: &str) -> PathBuf {
        self.root.join(version).join(asset)
    }

    /// Check whether a cache path already holds a file.
    ///
    /// Existence only - no integrity, executability, or version validation.
    /// An existing file is trusted as-is. Best-effort by design: a
    /// concurrent writer may race this check, so callers must treat the
    /// destination as safe-to-overwrite.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    /// Create the parent directory of a cache path, recursively.
    ///
    /// Idempotent - an already-existing directory is not an error.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if directory creation fails.
    pub async fn ensure_parent(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io_with_path(&e, parent))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_deterministic() {
        let cache = BinaryCache::new("/tmp/cache");
        let a = cache.binary_path("v0.3.6", "yed.linux");
        let b = cache.binary_path("v0.3.6", "yed.linux");
        assert_eq!(a, b);
        assert_eq!(a, PathBuf::from("/tmp/cache/v0.3.6/yed.linux"));
    }

    #[test]
    fn versions_are_isolated() {
        let cache = BinaryCache::new("/tmp/cache");
        assert_ne!(
            cache.binary_path("v0.3.6", "yed.linux"),
            cache.binary_path("v0.3.7", "yed.linux")
        );
    }

    #[tokio::test]
    async fn exists_reflects_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let cache = BinaryCache::new(dir.path());
        let path = cache.binary_path("v1.0.0", "yed.linux");

        assert!(!cache.exists(&path).await);

        cache.ensure_parent(&path).await.unwrap();
        tokio::fs::write(&path, b"bin").await.unwrap();
        assert!(cache.exists(&path).await);

        // A directory at the path is not a usable binary.
        let dir_path = cache.binary_path("v2.0.0", "yed.linux");
        tokio::fs::create_dir_all(&dir_path).await.unwrap();
        assert!(!cache.exists(&dir_path).await);
    }

    #[tokio::test]
    async fn ensure_parent_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = BinaryCache::new(dir.path());
        let path = cache.binary_path("v1.0.0", "yed.linux");

        cache.ensure_parent(&path).await.unwrap();
        cache.ensure_parent(&path).await.unwrap();
        assert!(path.parent().unwrap().is_dir());
    }
}
