#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Operations layer for yedctl
//!
//! The two externally consumed operations live here: `get_cli` provisions
//! the platform binary (resolve -> cache -> fetch -> chmod) and `run_cli`
//! drives it as a subprocess. Both are plain result-returning functions with
//! no dependency on any UI framework; front ends own progress rendering by
//! draining the event channel.

mod acquire;
mod context;
mod rules;
mod run;

pub use acquire::get_cli;
pub use context::OpsCtx;
pub use rules::append_rule;
pub use run::{run_cli, Mode, RunRequest, Transport};
