//! Project commands
//!
//! Projects group datasets and other platform resources. `project init`
//! binds the current directory to an existing project by writing the
//! project config file at its root.

use clap::Subcommand;
use comfy_table::{Table, presets};

use cm_core::project::{PROJECT_FILENAME, ProjectConfig, ProjectSection};

use crate::commands::Session;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// List projects in the active workspace
    List,

    /// Create a project in the active workspace
    Create(CreateArgs),

    /// Bind the current directory to an existing project
    Init(InitArgs),
}

/// Arguments for the `project create` command
#[derive(clap::Args, Debug)]
pub struct CreateArgs {
    /// Project name
    pub name: String,
}

/// Arguments for the `project init` command
#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Name of the project to bind this directory to
    #[arg(long, short)]
    pub project: String,
}

/// Execute a project subcommand
pub async fn execute(cmd: ProjectCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let session = match Session::load() {
        Ok(s) => s,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };
    let workspace = match session.workspace() {
        Ok(w) => w.to_owned(),
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    match cmd {
        ProjectCommands::List => execute_list(&session, &workspace, &formatter).await,
        ProjectCommands::Create(args) => execute_create(args, &session, &workspace, &formatter).await,
        ProjectCommands::Init(args) => execute_init(args, &session, &workspace, &formatter).await,
    }
}

async fn execute_list(session: &Session, workspace: &str, formatter: &Formatter) -> ExitCode {
    let projects = match session.api.projects(workspace).await {
        Ok(p) => p,
        Err(e) => {
            formatter.error(&format!("Failed to list projects: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    if formatter.is_json() {
        formatter.json(&projects);
        return ExitCode::Success;
    }

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(vec!["NAME", "ID", "CREATED"]);
    for project in &projects {
        let created = project
            .created_at
            .map(|t| t.strftime("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        table.add_row(vec![&project.name, &project.id, &created]);
    }
    formatter.println(&table.to_string());
    ExitCode::Success
}

async fn execute_create(
    args: CreateArgs,
    session: &Session,
    workspace: &str,
    formatter: &Formatter,
) -> ExitCode {
    match session.api.create_project(workspace, &args.name).await {
        Ok(project) => {
            if formatter.is_json() {
                formatter.json(&project);
            } else {
                formatter.success(&format!("Created project {} ({})", project.name, project.id));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to create project: {e}"));
            ExitCode::from_error(&e)
        }
    }
}

async fn execute_init(
    args: InitArgs,
    session: &Session,
    workspace: &str,
    formatter: &Formatter,
) -> ExitCode {
    let cwd = match std::env::current_dir() {
        Ok(d) => d,
        Err(e) => {
            formatter.error(&format!("Cannot determine current directory: {e}"));
            return ExitCode::GeneralError;
        }
    };

    // refuse to nest projects
    if let Ok(existing) = ProjectConfig::discover(&cwd) {
        formatter.error(&format!(
            "Already inside project '{}' ({})",
            existing.project.name,
            existing.config_file.display()
        ));
        return ExitCode::Conflict;
    }

    let projects = match session.api.projects(workspace).await {
        Ok(p) => p,
        Err(e) => {
            formatter.error(&format!("Failed to list projects: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    let Some(project) = projects.iter().find(|p| p.name == args.project) else {
        let available: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
        formatter.error(&format!(
            "Project '{}' not found in workspace {workspace}. Available: {}",
            args.project,
            available.join(", ")
        ));
        return ExitCode::NotFound;
    };

    let config = ProjectConfig {
        project: ProjectSection {
            id: project.id.clone(),
            name: project.name.clone(),
        },
        datasets: Default::default(),
        config_file: cwd.join(PROJECT_FILENAME),
    };
    if let Err(e) = config.save() {
        formatter.error(&format!("Failed to write {PROJECT_FILENAME}: {e}"));
        return ExitCode::GeneralError;
    }

    formatter.success(&format!(
        "Initialised {} as project {}",
        cwd.display(),
        project.name
    ));
    ExitCode::Success
}
