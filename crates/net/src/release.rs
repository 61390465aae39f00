//! GitHub-style `releases/latest` lookup
//!
//! Used when no release tag is pinned: the release document names the
//! download URL for each asset, and the caller follows it with the same
//! redirect-following fetcher as a pinned download.

use serde::Deserialize;
use yedctl_errors::{Error, NetworkError};
use yedctl_events::{EventEmitter, EventSender};

use crate::client::NetClient;

/// A published release, as returned by the release host API.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    pub assets: Vec<ReleaseAsset>,
}

/// One downloadable artifact of a release.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

impl Release {
    /// Find the download URL of the asset with the given name.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::AssetNotFound` when the release ships no asset
    /// under that name.
    pub fn asset_url(&self, asset_name: &str) -> Result<&str, Error> {
        self.assets
            .iter()
            .find(|a| a.name == asset_name)
            .map(|a| a.browser_download_url.as_str())
            .ok_or_else(|| {
                NetworkError::AssetNotFound {
                    asset: asset_name.to_string(),
                    release: self.tag_name.clone(),
                }
                .into()
            })
    }
}

/// Fetch the latest release document for `repo` from `api_host`.
///
/// # Errors
///
/// Returns an error if the request fails, the host answers with a non-2xx
/// status, or the body is not a valid release document.
pub async fn latest_release(
    client: &NetClient,
    api_host: &str,
    repo: &str,
    tx: &EventSender,
) -> Result<Release, Error> {
    let url = format!("{api_host}/repos/{repo}/releases/latest");
    tx.emit_debug(format!("fetching latest release from {url}"));

    let response = client.get(&url).await?;

    if !response.status().is_success() {
        return Err(NetworkError::HttpError {
            status: response.status().as_u16(),
            message: response.status().to_string(),
        }
        .into());
    }

    response
        .json::<Release>()
        .await
        .map_err(|e| NetworkError::DownloadFailed(format!("invalid release document: {e}")).into())
}
