//! yedctl - provision and drive the yed encrypt/decrypt binary
//!
//! This is the CLI front end over the library crates: it loads
//! configuration, wires up the event channel, and dispatches commands
//! through the ops crate.

mod cli;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands, InvokeArgs};
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use std::process;
use tokio::io::AsyncReadExt;
use tracing::{error, info};
use yedctl_config::Config;
use yedctl_events::EventSender;
use yedctl_ops::{append_rule, get_cli, run_cli, Mode, OpsCtx, RunRequest, Transport};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting yedctl v{}", env!("CARGO_PKG_VERSION"));

    // Configuration precedence: file defaults, then environment, then CLI
    // flags applied inside the command handlers.
    let mut config = Config::load_or_default(&cli.global.config).await?;
    config.merge_env()?;

    let (tx, mut rx) = yedctl_events::channel();
    let handler = EventHandler::new(cli.global.debug);
    let drain = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            handler.handle(&event);
        }
    });

    let result = execute(cli.command, config, tx).await;

    // All senders are dropped once the command finishes, which ends the
    // drain task after the last event is rendered.
    let _ = drain.await;
    result
}

async fn execute(command: Commands, config: Config, tx: EventSender) -> Result<(), CliError> {
    match command {
        Commands::Encrypt { value, invoke } => {
            transform(Mode::Encrypt, value, invoke, config, tx).await
        }
        Commands::Decrypt { value, invoke } => {
            transform(Mode::Decrypt, value, invoke, config, tx).await
        }
        Commands::Provision { version } => {
            let version = version.or_else(|| config.pinned_version().map(String::from));
            let ctx = OpsCtx::new(config, tx)?;
            let path = get_cli(&ctx, version.as_deref()).await?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::AddRule { rule, rules } => {
            let path = rules.unwrap_or_else(|| config.rules.file.clone());
            append_rule(&path, &rule).await?;
            eprintln!("Added rule to {}", path.display());
            Ok(())
        }
    }
}

/// Provision the binary and run one encrypt/decrypt transformation.
async fn transform(
    mode: Mode,
    value: Option<String>,
    invoke: InvokeArgs,
    mut config: Config,
    tx: EventSender,
) -> Result<(), CliError> {
    if invoke.validate {
        config.rules.validate = true;
    }
    if let Some(rules) = &invoke.rules {
        config.rules.file = rules.clone();
    }

    let payload = match value {
        Some(v) => v,
        None => read_stdin().await?,
    };

    let version = invoke
        .cli_version
        .or_else(|| config.pinned_version().map(String::from));
    let ctx = OpsCtx::new(config, tx)?;

    let binary = get_cli(&ctx, version.as_deref()).await?;

    let transport = match invoke.key {
        Some(key) => Transport::Args { key },
        None => Transport::Stdin {
            config_path: ctx.config.rules.file.clone(),
        },
    };
    let request = RunRequest {
        mode,
        payload,
        transport,
        validate: ctx.config.rules.validate,
    };

    let output = run_cli(&binary, &request, &ctx.tx).await?;
    println!("{output}");
    Ok(())
}

async fn read_stdin() -> Result<String, CliError> {
    let mut buf = String::new();
    tokio::io::stdin().read_to_string(&mut buf).await?;
    if buf.trim().is_empty() {
        return Err(CliError::InvalidArguments(
            "no value provided and stdin was empty".to_string(),
        ));
    }
    Ok(buf)
}
