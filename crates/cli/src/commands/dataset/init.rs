//! dataset init - bind the current directory to a data storage

use cm_core::path;
use cm_core::project::{DatasetEntry, ProjectConfig};

use crate::commands::Session;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Arguments for the `dataset init` command
#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Name of the dataset in the project to use; may be omitted when the
    /// project has exactly one
    #[arg(long, short)]
    pub dataset: Option<String>,
}

/// Execute the dataset init command
pub async fn execute(args: InitArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let session = match Session::load() {
        Ok(s) => s,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };
    let cwd = match std::env::current_dir() {
        Ok(d) => d,
        Err(e) => {
            formatter.error(&format!("Cannot determine current directory: {e}"));
            return ExitCode::GeneralError;
        }
    };

    let mut project = match ProjectConfig::discover(&cwd) {
        Ok(p) => p,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    // a directory can belong to at most one dataset
    if cm_core::resolve_binding(&project, &cwd).is_ok() {
        formatter.error("The current directory is already initialised as a dataset");
        return ExitCode::Conflict;
    }

    let workspace = match session.workspace() {
        Ok(w) => w.to_owned(),
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let storages = match session.api.data_storages(&workspace, &project.project.id).await {
        Ok(s) => s,
        Err(e) => {
            formatter.error(&format!("Failed to list datasets: {e}"));
            return ExitCode::from_error(&e);
        }
    };
    let ready: Vec<_> = storages.into_iter().filter(|s| s.is_ready()).collect();

    let storage = match &args.dataset {
        Some(name) => match ready.iter().find(|s| &s.name == name) {
            Some(s) => s,
            None => {
                formatter.error(&format!(
                    "No dataset named '{name}' in project {}",
                    project.project.name
                ));
                return ExitCode::NotFound;
            }
        },
        None => match ready.as_slice() {
            [] => {
                formatter.error("No datasets found in this project");
                return ExitCode::NotFound;
            }
            [only] => only,
            _ => {
                let names: Vec<&str> = ready.iter().map(|s| s.name.as_str()).collect();
                formatter.error(&format!(
                    "Project has several datasets; pick one with --dataset. Available: {}",
                    names.join(", ")
                ));
                return ExitCode::UsageError;
            }
        },
    };

    // record where this dataset lives, relative to the project root
    let relative = path::to_remote_prefixes(project.project_dir(), &[cwd.clone()])
        .pop()
        .unwrap_or_default();
    let local_directory = if relative.is_empty() { ".".to_owned() } else { relative };

    project.datasets.insert(
        storage.name.clone(),
        DatasetEntry {
            id: storage.id.clone(),
            local_directory,
        },
    );
    if let Err(e) = project.save() {
        formatter.error(&format!("Failed to save project config: {e}"));
        return ExitCode::GeneralError;
    }

    formatter.success(&format!(
        "Initialised {} as dataset {}",
        cwd.display(),
        storage.name
    ));
    ExitCode::Success
}
