//! Redirect-following streamed download

use futures::StreamExt;
use reqwest::StatusCode;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use url::Url;
use yedctl_errors::{Error, NetworkError};
use yedctl_events::{AppEvent, DownloadEvent, EventEmitter, EventSender, FailureContext};

use crate::client::NetClient;

/// Maximum redirect hops before a chain is treated as a loop.
pub const MAX_REDIRECTS: u32 = 5;

/// Outcome of a successful fetch.
#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub size: u64,
}

/// Download `url` to `dest`, following up to [`MAX_REDIRECTS`] redirect hops
/// and streaming the body straight to disk.
///
/// The destination is created (or overwritten) at the first 200 response.
/// On failure a partial file may remain; callers treat the destination as
/// unreliable and overwrite on retry.
///
/// # Errors
///
/// - `NetworkError::TooManyRedirects` past the hop bound
/// - `NetworkError::RedirectMissingLocation` for a 3xx without `Location`
/// - `NetworkError::HttpError` for any terminal status other than 200
/// - `NetworkError::Timeout` / `ConnectionRefused` / `DownloadFailed` for
///   transport failures
/// - I/O errors while writing the destination
pub async fn fetch_binary(
    client: &NetClient,
    url: &str,
    dest: &Path,
    tx: &EventSender,
) -> Result<DownloadResult, Error> {
    match follow_and_stream(client, url, dest, tx).await {
        Ok(result) => Ok(result),
        Err(e) => {
            tx.emit(AppEvent::Download(DownloadEvent::Failed {
                url: url.to_string(),
                failure: FailureContext::from_error(&e),
            }));
            Err(e)
        }
    }
}

async fn follow_and_stream(
    client: &NetClient,
    url: &str,
    dest: &Path,
    tx: &EventSender,
) -> Result<DownloadResult, Error> {
    let mut current = parse_url(url)?;
    let mut depth: u32 = 0;

    // Iterative walk rather than recursion: the depth counter is the loop
    // bound, and each hop replaces `current`.
    loop {
        let response = client.get(current.as_str()).await?;
        let status = response.status();

        if is_redirect(status) {
            let location = match response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
            {
                Some(loc) => loc.to_string(),
                None => {
                    return Err(NetworkError::RedirectMissingLocation {
                        status: status.as_u16(),
                        url: current.to_string(),
                    }
                    .into())
                }
            };

            depth += 1;
            if depth > MAX_REDIRECTS {
                return Err(NetworkError::TooManyRedirects {
                    url: url.to_string(),
                    limit: MAX_REDIRECTS,
                }
                .into());
            }

            // Location may be relative; resolve against the current URL.
            let next = current
                .join(&location)
                .map_err(|e| NetworkError::InvalidUrl(e.to_string()))?;

            tx.emit(AppEvent::Download(DownloadEvent::Redirected {
                url: current.to_string(),
                location: next.to_string(),
                depth,
            }));
            tracing::debug!(from = %current, to = %next, depth, "following redirect");

            current = next;
            continue;
        }

        if status == StatusCode::OK {
            return stream_to_file(response, current.as_str(), dest, tx).await;
        }

        return Err(NetworkError::HttpError {
            status: status.as_u16(),
            message: status.to_string(),
        }
        .into());
    }
}

fn is_redirect(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 307 | 308)
}

fn parse_url(url: &str) -> Result<Url, Error> {
    Url::parse(url).map_err(|e| NetworkError::InvalidUrl(e.to_string()).into())
}

fn should_report_progress(first_chunk: bool, last_update: &Instant) -> bool {
    first_chunk || last_update.elapsed() >= Duration::from_millis(50)
}

/// Stream the response body into `dest` without buffering it in memory.
async fn stream_to_file(
    response: reqwest::Response,
    url: &str,
    dest: &Path,
    tx: &EventSender,
) -> Result<DownloadResult, Error> {
    let total_size = response.content_length();

    tx.emit(AppEvent::Download(DownloadEvent::Started {
        url: url.to_string(),
        total_size,
    }));

    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| Error::io_with_path(&e, dest))?;

    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;
    let mut last_progress_update = Instant::now();
    let mut first_chunk = true;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| NetworkError::DownloadFailed(e.to_string()))?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;

        if should_report_progress(first_chunk, &last_progress_update) {
            tx.emit(AppEvent::Download(DownloadEvent::Progress {
                url: url.to_string(),
                bytes_downloaded: downloaded,
                total_bytes: total_size,
            }));
            last_progress_update = Instant::now();
            first_chunk = false;
        }
    }

    file.flush().await?;
    drop(file);

    tx.emit(AppEvent::Download(DownloadEvent::Completed {
        url: url.to_string(),
        final_size: downloaded,
    }));

    Ok(DownloadResult { size: downloaded })
}
