#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Platform resolution for yedctl
//!
//! Maps the running OS/architecture pair to the release asset that ships for
//! it, and owns the one platform-specific filesystem concern this system has:
//! marking a freshly downloaded binary executable.

mod fs;
mod triple;

pub use fs::make_executable;
pub use triple::{resolve_asset, PlatformTriple};
