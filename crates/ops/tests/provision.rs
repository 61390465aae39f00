//! End-to-end provisioning tests against a mock release host

use httpmock::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;
use yedctl_config::Config;
use yedctl_errors::{ConfigError, Error};
use yedctl_events::{channel, AcquireEvent, AppEvent, EventReceiver};
use yedctl_ops::{get_cli, OpsCtx};
use yedctl_platform::resolve_asset;

fn test_ctx(server: &MockServer, cache_root: &TempDir) -> (OpsCtx, EventReceiver) {
    let mut config = Config::default();
    config.binary.release_host = server.base_url();
    config.binary.api_host = server.base_url();
    config.binary.cache_dir = Some(cache_root.path().to_path_buf());

    let (tx, rx) = channel();
    (OpsCtx::new(config, tx).unwrap(), rx)
}

#[tokio::test]
async fn pinned_version_downloads_then_hits_cache() {
    let server = MockServer::start();
    let cache_root = TempDir::new().unwrap();
    let (ctx, mut rx) = test_ctx(&server, &cache_root);

    let asset = resolve_asset().unwrap();
    let download = server.mock(|when, then| {
        when.method(GET).path(format!(
            "/atlet99/yaml-encrypter-decrypter/releases/download/v0.3.6/{asset}"
        ));
        then.status(200).body("fake binary");
    });

    // Cache miss: one network fetch, file lands under {root}/{version}/{asset}.
    let path = get_cli(&ctx, Some("v0.3.6")).await.unwrap();
    assert_eq!(
        path,
        cache_root.path().join("v0.3.6").join(asset),
    );
    download.assert_hits(1);
    assert_eq!(tokio::fs::read(&path).await.unwrap(), b"fake binary");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = tokio::fs::metadata(&path).await.unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111, "binary should be executable");
    }

    // Cache hit: same path, still exactly one network call.
    let second = get_cli(&ctx, Some("v0.3.6")).await.unwrap();
    assert_eq!(second, path);
    download.assert_hits(1);

    let mut saw_fetch = 0;
    let mut saw_cache_hit = 0;
    while let Ok(event) = rx.try_recv() {
        match event {
            AppEvent::Acquire(AcquireEvent::Fetching { .. }) => saw_fetch += 1,
            AppEvent::Acquire(AcquireEvent::CacheHit { .. }) => saw_cache_hit += 1,
            _ => {}
        }
    }
    assert_eq!(saw_fetch, 1);
    assert_eq!(saw_cache_hit, 1);
}

#[tokio::test]
async fn versions_do_not_collide_in_cache() {
    let server = MockServer::start();
    let cache_root = TempDir::new().unwrap();
    let (ctx, _rx) = test_ctx(&server, &cache_root);

    let asset = resolve_asset().unwrap();
    for version in ["v1.0.0", "v2.0.0"] {
        server.mock(|when, then| {
            when.method(GET).path(format!(
                "/atlet99/yaml-encrypter-decrypter/releases/download/{version}/{asset}"
            ));
            then.status(200).body(version);
        });
    }

    let first = get_cli(&ctx, Some("v1.0.0")).await.unwrap();
    let second = get_cli(&ctx, Some("v2.0.0")).await.unwrap();
    assert_ne!(first, second);
    assert_eq!(tokio::fs::read(&first).await.unwrap(), b"v1.0.0");
    assert_eq!(tokio::fs::read(&second).await.unwrap(), b"v2.0.0");
}

#[tokio::test]
async fn latest_resolves_through_release_api() {
    let server = MockServer::start();
    let cache_root = TempDir::new().unwrap();
    let (ctx, _rx) = test_ctx(&server, &cache_root);

    let asset = resolve_asset().unwrap();
    let api = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/atlet99/yaml-encrypter-decrypter/releases/latest");
        then.status(200).json_body(serde_json::json!({
            "tag_name": "v0.9.9",
            "assets": [
                {"name": asset, "browser_download_url": server.url("/assets/latest-bin")}
            ]
        }));
    });
    let download = server.mock(|when, then| {
        when.method(GET).path("/assets/latest-bin");
        then.status(200).body("latest binary");
    });

    let path = get_cli(&ctx, None).await.unwrap();
    assert_eq!(path, cache_root.path().join("v0.9.9").join(asset));
    api.assert_hits(1);
    download.assert_hits(1);

    // The resolved tag keys the cache, so a pinned call for the same tag
    // needs no further download.
    let pinned = get_cli(&ctx, Some("v0.9.9")).await.unwrap();
    assert_eq!(pinned, path);
    download.assert_hits(1);
}

#[tokio::test]
async fn download_error_propagates_unmodified() {
    let server = MockServer::start();
    let cache_root = TempDir::new().unwrap();
    let (ctx, _rx) = test_ctx(&server, &cache_root);

    let asset = resolve_asset().unwrap();
    server.mock(|when, then| {
        when.method(GET).path(format!(
            "/atlet99/yaml-encrypter-decrypter/releases/download/v9.9.9/{asset}"
        ));
        then.status(500);
    });

    let err = get_cli(&ctx, Some("v9.9.9")).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Network(yedctl_errors::NetworkError::HttpError { status: 500, .. })
    ));
}

#[tokio::test]
async fn custom_binary_path_bypasses_provisioning() {
    let server = MockServer::start();
    let cache_root = TempDir::new().unwrap();

    let custom_dir = TempDir::new().unwrap();
    let custom = custom_dir.path().join("yed-local");
    tokio::fs::write(&custom, b"local build").await.unwrap();

    let mut config = Config::default();
    config.binary.release_host = server.base_url();
    config.binary.cache_dir = Some(cache_root.path().to_path_buf());
    config.binary.path = Some(custom.clone());
    let (tx, _rx) = channel();
    let ctx = OpsCtx::new(config, tx).unwrap();

    let path = get_cli(&ctx, Some("v0.3.6")).await.unwrap();
    assert_eq!(path, custom);

    // A configured path that does not exist is a config error, not a fetch.
    let mut config = Config::default();
    config.binary.cache_dir = Some(cache_root.path().to_path_buf());
    config.binary.path = Some(PathBuf::from("/nonexistent/yed"));
    let (tx, _rx) = channel();
    let ctx = OpsCtx::new(config, tx).unwrap();
    let err = get_cli(&ctx, Some("v0.3.6")).await.unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::NotFound { .. })));
}

#[tokio::test]
async fn empty_version_is_rejected() {
    let server = MockServer::start();
    let cache_root = TempDir::new().unwrap();
    let (ctx, _rx) = test_ctx(&server, &cache_root);

    let err = get_cli(&ctx, Some("")).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue { .. })
    ));
}
