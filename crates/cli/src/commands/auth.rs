//! Authentication commands
//!
//! Stores a personal access token in the root config after verifying it
//! against the platform. Token creation itself happens in the web console.

use clap::Subcommand;
use serde::Serialize;

use cm_core::ConfigManager;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Auth subcommands
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Verify a personal access token and store it
    Login(LoginArgs),

    /// Show the current login state
    Status,
}

/// Arguments for the `auth login` command
#[derive(clap::Args, Debug)]
pub struct LoginArgs {
    /// Personal access token from the platform's web console
    #[arg(long, env = "CUMULUS_TOKEN")]
    pub token: String,

    /// Override the platform API endpoint
    #[arg(long)]
    pub api_url: Option<String>,
}

#[derive(Serialize)]
struct StatusOutput {
    logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    api_url: String,
}

/// Execute an auth subcommand
pub async fn execute(cmd: AuthCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    match cmd {
        AuthCommands::Login(args) => execute_login(args, &formatter).await,
        AuthCommands::Status => execute_status(&formatter),
    }
}

async fn execute_login(args: LoginArgs, formatter: &Formatter) -> ExitCode {
    let manager = match ConfigManager::new() {
        Ok(m) => m,
        Err(e) => {
            formatter.error(&format!("Failed to locate config: {e}"));
            return ExitCode::GeneralError;
        }
    };
    let mut config = match manager.load() {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to load config: {e}"));
            return ExitCode::GeneralError;
        }
    };

    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }

    let api = match cm_api::ApiClient::new(&config.api_url, args.token.clone()) {
        Ok(api) => api,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    // one user lookup both verifies the token and names its owner
    let user = match api.user().await {
        Ok(user) => user,
        Err(e) => {
            formatter.error(&format!("Login failed: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    config.auth.username = Some(user.username.clone());
    config.auth.token = Some(args.token);
    if config.workspace.username.is_none() {
        config.workspace.username = Some(user.username.clone());
    }

    if let Err(e) = manager.save(&config) {
        formatter.error(&format!("Failed to save config: {e}"));
        return ExitCode::GeneralError;
    }

    formatter.success(&format!("Logged in as {}", user.username));
    ExitCode::Success
}

fn execute_status(formatter: &Formatter) -> ExitCode {
    let config = match ConfigManager::new().and_then(|m| m.load()) {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to load config: {e}"));
            return ExitCode::GeneralError;
        }
    };

    let logged_in = config.auth.token.is_some();

    if formatter.is_json() {
        formatter.json(&StatusOutput {
            logged_in,
            username: config.auth.username.clone(),
            api_url: config.api_url.clone(),
        });
        return if logged_in {
            ExitCode::Success
        } else {
            ExitCode::AuthError
        };
    }

    if logged_in {
        let username = config.auth.username.as_deref().unwrap_or("<unknown>");
        formatter.println(&format!("Logged in as {username} ({})", config.api_url));
        ExitCode::Success
    } else {
        formatter.warning("Not logged in. Run `cm auth login --token <token>`.");
        ExitCode::AuthError
    }
}
