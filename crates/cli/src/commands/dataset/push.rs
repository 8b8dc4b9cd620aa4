//! dataset push - upload local files to a dataset
//!
//! Requires the current directory to be initialised as a dataset first
//! (`cm dataset init`). With no path arguments the current directory is
//! pushed.

use crate::exit_code::ExitCode;
use crate::output::{CliReporter, Formatter, OutputConfig};

/// Arguments for the `dataset push` command
#[derive(clap::Args, Debug)]
pub struct PushArgs {
    /// Files or directories to upload; defaults to the current directory
    pub paths: Vec<String>,
}

/// Execute the dataset push command
pub async fn execute(args: PushArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config.clone());

    let context = match super::transfer_context().await {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let reporter = CliReporter::new(output_config);
    match cm_core::transfer::push(
        context.store,
        &reporter,
        &context.binding,
        &args.paths,
        &context.cwd,
    )
    .await
    {
        Ok(()) => {
            formatter.success("Push complete");
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}
