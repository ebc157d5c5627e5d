// file: src/cli/commands.rs
// version: 1.0.0
// guid: 7c2e9a41-d5b8-4f03-a6e2-1b9d8c47f015

//! Command implementations for the CLI

use crate::{
    cli::args::InvokeArgs,
    config::Config,
    executor::Executor,
    invocation::Invocation,
    logging::logger::with_async_operation_span,
    reporter::{ConsoleReporter, ExecutionResult},
    variant::CommandVariant,
    Result,
};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Exit code reported when the toolchain could not be started or awaited
pub const INVOCATION_FAILURE_EXIT: i32 = 1;

/// Run one toolchain command and report it on the console
pub async fn invoke_command(
    variant: CommandVariant,
    args: InvokeArgs,
    config: Config,
) -> Result<ExecutionResult> {
    let dir = match &config.general.working_directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    debug!("Resolving parameters for {} in {}", variant, dir.display());

    let params = args.to_parameters(variant, &dir)?;
    if params.project_path.is_none() {
        info!("No project file found, letting the toolchain pick one");
    }

    let mut reporter = ConsoleReporter::new(params.verbosity, params.tags.clone(), args.json);
    let executor = Executor::new(config);
    let mut invocation = Invocation::new(variant, params);

    let running = &mut invocation;
    let sink = &mut reporter;
    let result = with_async_operation_span(variant.as_str(), move || async move {
        running.run(&executor, sink).await
    })
    .await?;

    if let Some(failure) = &result.invocation_failure {
        warn!("Invocation {} failed: {}", invocation.id(), failure);
    } else {
        info!(
            "Invocation {} finished with exit code {}",
            invocation.id(),
            result.exit_code
        );
    }

    Ok(result)
}

/// Print usage text; the toolchain is not started
pub fn help_command(variant: Option<CommandVariant>) -> Result<()> {
    match variant {
        Some(variant) => println!("{}", variant.usage()),
        None => {
            println!("Usage: dotnet-invoke <COMMAND> [PROJECT] [OPTIONS]\n");
            println!("Commands:");
            for variant in CommandVariant::ALL {
                println!("  {:<10} {}", variant.as_str(), variant.spec().description);
            }
            println!("\nRun `dotnet-invoke help <COMMAND>` for the options of a command.");
        }
    }
    Ok(())
}

/// Process exit code for a finished invocation
pub fn exit_code_for(result: &ExecutionResult) -> i32 {
    if result.invocation_failure.is_some() {
        INVOCATION_FAILURE_EXIT
    } else {
        result.exit_code
    }
}
