//! dataset pull - download files from a dataset
//!
//! Each path may name a remote file or a directory-like prefix; the kind is
//! resolved against the store before anything is transferred. With no path
//! arguments the current directory's whole prefix is pulled.

use crate::exit_code::ExitCode;
use crate::output::{CliReporter, Formatter, OutputConfig};

/// Arguments for the `dataset pull` command
#[derive(clap::Args, Debug)]
pub struct PullArgs {
    /// Files or directories to download; defaults to the current directory
    pub paths: Vec<String>,
}

/// Execute the dataset pull command
pub async fn execute(args: PullArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config.clone());

    let context = match super::transfer_context().await {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let reporter = CliReporter::new(output_config);
    match cm_core::transfer::pull(
        context.store,
        &reporter,
        &context.binding,
        &args.paths,
        &context.cwd,
    )
    .await
    {
        Ok(()) => {
            formatter.success("Pull complete");
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}
