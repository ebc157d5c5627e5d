// file: src/main.rs
// version: 1.0.0
// guid: a41e7d93-0c5b-4b28-9f6e-d37b2c8e5a10

//! dotnet-invoke - Main entry point

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use dotnet_invoke::{
    cli::{
        args::{Cli, Commands},
        commands::{exit_code_for, help_command, invoke_command},
    },
    config::Config,
    logging::logger,
    InvokeError,
};
use tokio::signal;
use tracing::warn;

/// Exit code for parameter validation errors, matching clap's usage errors
const VALIDATION_EXIT: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            match e.downcast_ref::<InvokeError>() {
                Some(InvokeError::Validation(_)) | Some(InvokeError::InvalidArgument(_)) => {
                    VALIDATION_EXIT
                }
                _ => 1,
            }
        }
    };

    std::process::exit(code);
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = Config::load().await.context("Failed to load configuration")?;

    // Initialize logging
    logger::init_logger(cli.debug, cli.quiet, &config.logging)?;

    if let Commands::Help { command } = &cli.command {
        help_command(*command)?;
        return Ok(0);
    }
    let Some((variant, args)) = cli.command.invocation() else {
        return Ok(0);
    };

    let shutdown_signal = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    // The toolchain shares our process group and receives the same interrupt
    tokio::select! {
        result = invoke_command(variant, args, config) => Ok(exit_code_for(&result?)),
        _ = shutdown_signal => {
            warn!("Interrupted by user");
            Ok(130)
        }
    }
}
