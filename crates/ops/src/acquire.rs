//! Binary provisioning
//!
//! `get_cli` is the single entry point the rest of the system consumes:
//! resolve the asset for this platform, return the cached copy when one
//! exists, otherwise download from the release host and mark it executable.

use std::path::PathBuf;

use yedctl_errors::{ConfigError, Error};
use yedctl_events::{AcquireEvent, AppEvent, EventEmitter, FailureContext};
use yedctl_net::{fetch_binary, latest_release};
use yedctl_platform::{make_executable, resolve_asset};

use crate::OpsCtx;

/// Provision the yed binary for `version` and return its local path.
///
/// `None` resolves the latest published release. A configured custom binary
/// path bypasses provisioning entirely. The operation is idempotent: a
/// second call for a cached version performs no network access and no
/// permission re-check - an existing file is trusted as-is.
///
/// # Errors
///
/// - `PlatformError::UnsupportedPlatform` when no asset exists for this host
/// - `ConfigError` for an empty version pin or a missing custom binary
/// - any `NetworkError` from the release lookup or download, unmodified
///
/// On error the caller must not assume the binary is usable; a partial file
/// may remain at the destination and is overwritten on retry.
pub async fn get_cli(ctx: &OpsCtx, version: Option<&str>) -> Result<PathBuf, Error> {
    // A pre-installed binary wins outright.
    if let Some(custom) = &ctx.config.binary.path {
        if tokio::fs::metadata(custom)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
        {
            tracing::debug!(path = %custom.display(), "using custom binary path");
            return Ok(custom.clone());
        }
        return Err(ConfigError::NotFound {
            path: custom.display().to_string(),
        }
        .into());
    }

    if version == Some("") {
        return Err(ConfigError::InvalidValue {
            field: "version".to_string(),
            value: String::new(),
        }
        .into());
    }

    let asset = resolve_asset()?;

    match provision(ctx, version, asset).await {
        Ok(path) => Ok(path),
        Err(e) => {
            ctx.emit(AppEvent::Acquire(AcquireEvent::Failed {
                version: version.unwrap_or("latest").to_string(),
                failure: FailureContext::from_error(&e),
            }));
            Err(e)
        }
    }
}

async fn provision(ctx: &OpsCtx, version: Option<&str>, asset: &str) -> Result<PathBuf, Error> {
    let binary = &ctx.config.binary;

    // Resolve the cache tag and download URL. A pinned version never
    // touches the network here; "latest" needs one API round-trip to learn
    // the tag before the cache can be consulted.
    let (tag, url) = match version {
        Some(tag) => {
            let url = format!(
                "{}/{}/releases/download/{tag}/{asset}",
                binary.release_host, binary.repo
            );
            (tag.to_string(), url)
        }
        None => {
            let release = latest_release(&ctx.net, &binary.api_host, &binary.repo, &ctx.tx).await?;
            let url = release.asset_url(asset)?.to_string();
            (release.tag_name.clone(), url)
        }
    };

    ctx.emit(AppEvent::Acquire(AcquireEvent::Started {
        version: tag.clone(),
        asset: asset.to_string(),
    }));

    let path = ctx.cache.binary_path(&tag, asset);
    if ctx.cache.exists(&path).await {
        ctx.emit(AppEvent::Acquire(AcquireEvent::CacheHit {
            version: tag,
            path: path.clone(),
        }));
        return Ok(path);
    }

    ctx.cache.ensure_parent(&path).await?;

    ctx.emit(AppEvent::Acquire(AcquireEvent::Fetching {
        version: tag.clone(),
        url: url.clone(),
    }));
    fetch_binary(&ctx.net, &url, &path, &ctx.tx).await?;

    make_executable(&path).await?;

    ctx.emit(AppEvent::Acquire(AcquireEvent::Completed {
        version: tag,
        path: path.clone(),
    }));
    Ok(path)
}
