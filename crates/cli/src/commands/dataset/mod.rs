//! Dataset commands
//!
//! `dataset init` binds the current directory to one of the project's data
//! storages; `push` and `pull` move files between that directory and the
//! dataset's object storage.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Subcommand;

use cm_api::StorageClient;
use cm_core::{DatasetBinding, DatasetStore, ProjectConfig, Result};

use crate::commands::Session;
use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

mod init;
mod pull;
mod push;

/// Dataset subcommands
#[derive(Subcommand, Debug)]
pub enum DatasetCommands {
    /// Initialise the current directory as a dataset
    Init(init::InitArgs),

    /// Push local files to the dataset
    Push(push::PushArgs),

    /// Pull files from the dataset
    Pull(pull::PullArgs),
}

/// Execute a dataset subcommand
pub async fn execute(cmd: DatasetCommands, output_config: OutputConfig) -> ExitCode {
    match cmd {
        DatasetCommands::Init(args) => init::execute(args, output_config).await,
        DatasetCommands::Push(args) => push::execute(args, output_config).await,
        DatasetCommands::Pull(args) => pull::execute(args, output_config).await,
    }
}

/// Everything a transfer command needs: the binding that contains the
/// current directory and a storage client scoped to its dataset.
pub(crate) struct TransferContext {
    pub binding: DatasetBinding,
    pub store: Arc<dyn DatasetStore>,
    pub cwd: PathBuf,
}

/// Resolve the dataset binding for the current directory and build its
/// storage client. Fails before any transfer when the directory is not
/// initialised or the platform refuses credentials.
pub(crate) async fn transfer_context() -> Result<TransferContext> {
    let session = Session::load()?;
    let cwd = std::env::current_dir()?;
    let project = ProjectConfig::discover(&cwd)?;
    let binding = cm_core::resolve_binding(&project, &cwd)?;

    let credentials = session.api.storage_credentials(&binding.dataset_id).await?;
    let store = StorageClient::new(credentials).await?;

    Ok(TransferContext {
        binding,
        store: Arc::new(store),
        cwd,
    })
}
