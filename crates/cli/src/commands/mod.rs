//! CLI command definitions and execution
//!
//! Commands are grouped by noun (auth, workspace, project, dataset,
//! cloud-profile) and each implementation follows the same pattern:
//! `execute(args, OutputConfig) -> ExitCode`.

use clap::{Parser, Subcommand};

use cm_api::ApiClient;
use cm_core::{Config, ConfigManager, Result};

use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

mod auth;
mod cloud_profile;
mod completions;
pub mod dataset;
mod project;
mod workspace;

/// cm - Cumulus CLI
///
/// Command-line client for the Cumulus cloud ML platform. Manage
/// workspaces, projects and cloud profiles, and push/pull dataset files
/// between the local working tree and the platform's object storage.
#[derive(Parser, Debug)]
#[command(name = "cm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress bars
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in to the platform and inspect the login state
    #[command(subcommand)]
    Auth(auth::AuthCommands),

    /// List and switch workspaces
    #[command(subcommand)]
    Workspace(workspace::WorkspaceCommands),

    /// Manage projects in the active workspace
    #[command(subcommand)]
    Project(project::ProjectCommands),

    /// Bind local directories to datasets and transfer files
    #[command(subcommand)]
    Dataset(dataset::DatasetCommands),

    /// Inspect the workspace's cloud profiles
    #[command(subcommand)]
    CloudProfile(cloud_profile::CloudProfileCommands),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Auth(cmd) => auth::execute(cmd, output_config).await,
        Commands::Workspace(cmd) => workspace::execute(cmd, output_config).await,
        Commands::Project(cmd) => project::execute(cmd, output_config).await,
        Commands::Dataset(cmd) => dataset::execute(cmd, output_config).await,
        Commands::CloudProfile(cmd) => cloud_profile::execute(cmd, output_config).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

/// Authenticated command context: root config plus an API client built
/// from the stored token.
pub(crate) struct Session {
    pub config: Config,
    pub api: ApiClient,
}

impl Session {
    /// Load the root config and require a usable login.
    pub fn load() -> Result<Self> {
        let manager = ConfigManager::new()?;
        let config = manager.load()?;
        let api = ApiClient::new(&config.api_url, config.require_token()?)?;
        Ok(Self { config, api })
    }

    /// Workspace commands run against.
    pub fn workspace(&self) -> Result<&str> {
        self.config.active_workspace()
    }
}
