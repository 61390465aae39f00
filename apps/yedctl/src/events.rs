//! Event handling for the CLI
//!
//! Drains the event channel, mirrors every event into tracing, and prints
//! the user-facing milestones to stderr (stdout is reserved for command
//! results so the tool composes in pipelines).

use tracing::{debug, error, info, warn};
use yedctl_events::{AcquireEvent, AppEvent, DownloadEvent, GeneralEvent, RunEvent};

pub struct EventHandler {
    debug: bool,
}

impl EventHandler {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    pub fn handle(&self, event: &AppEvent) {
        match event {
            AppEvent::Acquire(acquire) => self.handle_acquire(acquire),
            AppEvent::Download(download) => self.handle_download(download),
            AppEvent::Run(run) => Self::handle_run(run),
            AppEvent::General(general) => self.handle_general(general),
        }
    }

    fn handle_acquire(&self, event: &AcquireEvent) {
        match event {
            AcquireEvent::Started { version, asset } => {
                info!(version = %version, asset = %asset, "provisioning started");
            }
            AcquireEvent::CacheHit { version, path } => {
                debug!(version = %version, path = %path.display(), "cache hit");
            }
            AcquireEvent::Fetching { version, url } => {
                info!(version = %version, url = %url, "fetching binary");
                eprintln!("Downloading yed {version}...");
            }
            AcquireEvent::Completed { version, path } => {
                info!(version = %version, path = %path.display(), "provisioning completed");
                if self.debug {
                    eprintln!("yed {version} ready at {}", path.display());
                }
            }
            AcquireEvent::Failed { version, failure } => {
                error!(version = %version, code = ?failure.code, message = %failure.message, "provisioning failed");
            }
        }
    }

    fn handle_download(&self, event: &DownloadEvent) {
        match event {
            DownloadEvent::Started { url, total_size } => {
                debug!(url = %url, total_size = ?total_size, "download started");
            }
            DownloadEvent::Redirected { url, location, depth } => {
                debug!(from = %url, to = %location, depth, "following redirect");
            }
            DownloadEvent::Progress {
                url,
                bytes_downloaded,
                total_bytes,
            } => {
                if self.debug {
                    debug!(url = %url, bytes_downloaded, total_bytes = ?total_bytes, "download progress");
                }
            }
            DownloadEvent::Completed { url, final_size } => {
                debug!(url = %url, final_size, "download completed");
            }
            DownloadEvent::Failed { url, failure } => {
                error!(url = %url, retryable = failure.retryable, message = %failure.message, "download failed");
            }
        }
    }

    fn handle_run(event: &RunEvent) {
        match event {
            RunEvent::Started { mode } => {
                debug!(mode = %mode, "invocation started");
            }
            RunEvent::Completed { mode, stdout_bytes } => {
                debug!(mode = %mode, stdout_bytes, "invocation completed");
            }
            RunEvent::Failed { mode, failure } => {
                error!(mode = %mode, code = ?failure.code, message = %failure.message, "invocation failed");
            }
        }
    }

    fn handle_general(&self, event: &GeneralEvent) {
        match event {
            GeneralEvent::Warning { message, context } => {
                warn!(message = %message, context = ?context, "warning");
                eprintln!("Warning: {message}");
            }
            GeneralEvent::Error { message, details } => {
                error!(message = %message, details = ?details, "error");
            }
            GeneralEvent::DebugLog { message, .. } => {
                if self.debug {
                    debug!("{message}");
                }
            }
        }
    }
}
