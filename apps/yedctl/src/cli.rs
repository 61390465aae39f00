//! Command line interface definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// yedctl - provision and drive the yed encrypt/decrypt binary
#[derive(Parser)]
#[command(name = "yedctl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Provision and drive the yed encrypt/decrypt binary")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt a value with the provisioned binary
    #[command(alias = "e")]
    Encrypt {
        /// Value to encrypt; read from stdin when omitted
        value: Option<String>,

        #[command(flatten)]
        invoke: InvokeArgs,
    },

    /// Decrypt a value with the provisioned binary
    #[command(alias = "d")]
    Decrypt {
        /// Value to decrypt; read from stdin when omitted
        value: Option<String>,

        #[command(flatten)]
        invoke: InvokeArgs,
    },

    /// Download and cache the binary without running it
    Provision {
        /// Release tag to provision (default: configured pin, else latest)
        #[arg(long, value_name = "TAG")]
        version: Option<String>,
    },

    /// Append a plaintext rule to the rules sidecar
    AddRule {
        /// Rule pattern to append
        rule: String,

        /// Sidecar file (default: configured rules file)
        #[arg(long, value_name = "PATH")]
        rules: Option<PathBuf>,
    },
}

/// Arguments shared by encrypt and decrypt
#[derive(Parser)]
pub struct InvokeArgs {
    /// Encryption key. When set, key and value are passed as arguments;
    /// otherwise the payload goes over stdin and the rules sidecar is used.
    #[arg(long, env = "YED_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Ask the binary to validate the rules file
    #[arg(long)]
    pub validate: bool,

    /// Rules sidecar file (default: configured rules file)
    #[arg(long, value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Release tag to provision (default: configured pin, else latest)
    #[arg(long, value_name = "TAG")]
    pub cli_version: Option<String>,
}
