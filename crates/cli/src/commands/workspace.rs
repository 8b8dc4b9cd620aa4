//! Workspace commands
//!
//! A workspace is the account (personal or team) that owns projects and
//! cloud profiles. The active workspace is stored in the root config.

use clap::Subcommand;
use comfy_table::{Table, presets};
use serde::Serialize;

use cm_core::ConfigManager;

use crate::commands::Session;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Workspace subcommands
#[derive(Subcommand, Debug)]
pub enum WorkspaceCommands {
    /// List workspaces you belong to
    List,

    /// Show the active workspace
    Current,

    /// Switch the active workspace
    Set(SetArgs),
}

/// Arguments for the `workspace set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Workspace name to switch to
    pub name: String,
}

#[derive(Serialize)]
struct WorkspaceRow {
    username: String,
    is_team: bool,
    active: bool,
}

/// Execute a workspace subcommand
pub async fn execute(cmd: WorkspaceCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let session = match Session::load() {
        Ok(s) => s,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    match cmd {
        WorkspaceCommands::List => execute_list(&session, &formatter).await,
        WorkspaceCommands::Current => execute_current(&session, &formatter),
        WorkspaceCommands::Set(args) => execute_set(args, session, &formatter).await,
    }
}

async fn execute_list(session: &Session, formatter: &Formatter) -> ExitCode {
    let workspaces = match session.api.workspaces().await {
        Ok(w) => w,
        Err(e) => {
            formatter.error(&format!("Failed to list workspaces: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    let active = session.workspace().unwrap_or_default().to_owned();

    if formatter.is_json() {
        let rows: Vec<WorkspaceRow> = workspaces
            .iter()
            .map(|w| WorkspaceRow {
                username: w.username.clone(),
                is_team: w.is_team,
                active: w.username == active,
            })
            .collect();
        formatter.json(&rows);
        return ExitCode::Success;
    }

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(vec!["", "WORKSPACE", "TYPE"]);
    for workspace in &workspaces {
        let marker = if workspace.username == active { "*" } else { "" };
        let kind = if workspace.is_team { "team" } else { "personal" };
        table.add_row(vec![marker, workspace.username.as_str(), kind]);
    }
    formatter.println(&table.to_string());
    ExitCode::Success
}

fn execute_current(session: &Session, formatter: &Formatter) -> ExitCode {
    match session.workspace() {
        Ok(workspace) => {
            if formatter.is_json() {
                formatter.json(&serde_json::json!({ "workspace": workspace }));
            } else {
                formatter.println(workspace);
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}

async fn execute_set(args: SetArgs, mut session: Session, formatter: &Formatter) -> ExitCode {
    // only switch to a workspace the user actually belongs to
    let workspaces = match session.api.workspaces().await {
        Ok(w) => w,
        Err(e) => {
            formatter.error(&format!("Failed to list workspaces: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    if !workspaces.iter().any(|w| w.username == args.name) {
        formatter.error(&format!("Workspace '{}' not found", args.name));
        return ExitCode::NotFound;
    }

    session.config.workspace.username = Some(args.name.clone());

    let manager = match ConfigManager::new() {
        Ok(m) => m,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::GeneralError;
        }
    };
    if let Err(e) = manager.save(&session.config) {
        formatter.error(&format!("Failed to save config: {e}"));
        return ExitCode::GeneralError;
    }

    formatter.success(&format!("Switched to workspace {}", args.name));
    ExitCode::Success
}
