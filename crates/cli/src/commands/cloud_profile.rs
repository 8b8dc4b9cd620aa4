//! Cloud profile commands
//!
//! Cloud profiles are managed in the platform's web console; the CLI only
//! lists them so users can see which vendor backs each dataset.

use clap::Subcommand;
use comfy_table::{Table, presets};

use crate::commands::Session;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Cloud profile subcommands
#[derive(Subcommand, Debug)]
pub enum CloudProfileCommands {
    /// List the workspace's cloud profiles
    List,
}

/// Execute a cloud-profile subcommand
pub async fn execute(cmd: CloudProfileCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let session = match Session::load() {
        Ok(s) => s,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    match cmd {
        CloudProfileCommands::List => execute_list(&session, &formatter).await,
    }
}

async fn execute_list(session: &Session, formatter: &Formatter) -> ExitCode {
    let workspace = match session.workspace() {
        Ok(w) => w.to_owned(),
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let profiles = match session.api.cloud_profiles(&workspace).await {
        Ok(p) => p,
        Err(e) => {
            formatter.error(&format!("Failed to list cloud profiles: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    if formatter.is_json() {
        formatter.json(&profiles);
        return ExitCode::Success;
    }

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(vec!["NAME", "PROVIDER", "ID"]);
    for profile in &profiles {
        table.add_row(vec![
            profile.name.clone(),
            profile.provider.to_string(),
            profile.id.clone(),
        ]);
    }
    formatter.println(&table.to_string());
    ExitCode::Success
}
