//! Tracing initialization for the CLI

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber.
///
/// `--debug` lowers the filter to debug for our crates; otherwise the
/// `RUST_LOG` environment variable applies, defaulting to warnings only.
/// Everything goes to stderr - stdout carries command results.
pub fn init_tracing(debug: bool) {
    let default_filter = if debug { "yedctl=debug,warn" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
