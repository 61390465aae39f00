use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::FailureContext;

/// Binary provisioning events (cache lookup through executable-bit setup)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AcquireEvent {
    /// Provisioning started for a version/asset pair
    Started { version: String, asset: String },

    /// The requested version was already cached; no network access happens
    CacheHit { version: String, path: PathBuf },

    /// Cache miss; fetching from the release host
    Fetching { version: String, url: String },

    /// Binary is on disk and executable
    Completed { version: String, path: PathBuf },

    /// Provisioning failed
    Failed {
        version: String,
        failure: FailureContext,
    },
}
