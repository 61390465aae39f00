#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for yedctl
//!
//! This crate owns the HTTP side of binary provisioning: the shared client,
//! the redirect-following streamed download, and the GitHub-style
//! `releases/latest` lookup. Redirects are followed manually with a bounded
//! hop count, so the underlying client has automatic redirects disabled.

mod client;
mod fetch;
mod release;

pub use client::{NetClient, NetConfig};
pub use fetch::{fetch_binary, DownloadResult, MAX_REDIRECTS};
pub use release::{latest_release, Release, ReleaseAsset};
