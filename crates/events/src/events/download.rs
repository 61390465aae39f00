use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Download-specific events for the event system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DownloadEvent {
    /// Download started
    Started {
        url: String,
        total_size: Option<u64>,
    },

    /// The release host answered with a redirect; the fetcher is following it
    Redirected {
        url: String,
        location: String,
        depth: u32,
    },

    /// Download progress update
    Progress {
        url: String,
        bytes_downloaded: u64,
        total_bytes: Option<u64>,
    },

    /// Download completed successfully
    Completed { url: String, final_size: u64 },

    /// Download failed
    Failed { url: String, failure: FailureContext },
}
