//! Root configuration management
//!
//! Loads and saves the per-user CLI configuration (API endpoint, auth
//! token, active workspace) stored in TOML at ~/.config/cumulus/config.toml.
//! The `CUMULUS_CONFIG_DIR` environment variable overrides the directory,
//! which keeps tests and CI isolated from a real login.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default platform API endpoint
pub const DEFAULT_API_URL: &str = "https://api.cumulus-ml.com";

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "CUMULUS_CONFIG_DIR";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Platform API endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Login state
    #[serde(default)]
    pub auth: Auth,

    /// Active workspace selection
    #[serde(default)]
    pub workspace: Workspace,
}

/// Credentials of the logged-in user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Auth {
    /// Username the token belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Personal access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Active workspace; commands run against this account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            auth: Auth::default(),
            workspace: Workspace::default(),
        }
    }
}

impl Config {
    /// Token of the logged-in user, or an auth error telling the user to log in
    pub fn require_token(&self) -> Result<&str> {
        self.auth
            .token
            .as_deref()
            .ok_or_else(|| Error::Auth("not logged in, run `cm auth login` first".into()))
    }

    /// Workspace commands run against: the selected one, falling back to
    /// the logged-in user's personal workspace.
    pub fn active_workspace(&self) -> Result<&str> {
        self.workspace
            .username
            .as_deref()
            .or(self.auth.username.as_deref())
            .ok_or_else(|| Error::Config("no active workspace, run `cm workspace set`".into()))
    }
}

/// Configuration manager handles loading and saving config
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the default config path
    pub fn new() -> Result<Self> {
        let config_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .ok_or_else(|| Error::Config("Could not determine config directory".into()))?
                .join("cumulus"),
        };
        Ok(Self {
            config_path: config_dir.join("config.toml"),
        })
    }

    /// Create a ConfigManager with a custom path (useful for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load configuration from disk
    ///
    /// If the configuration file doesn't exist, returns a default configuration.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to disk
    ///
    /// Creates parent directories if they don't exist.
    /// Sets file permissions to 600 (owner read/write only).
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;
        std::fs::write(&self.config_path, content)?;

        // The config holds an access token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.config_path, permissions)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        (ConfigManager::with_path(config_path), temp_dir)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.auth.token.is_none());
        assert!(config.require_token().is_err());
        assert!(config.active_workspace().is_err());
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let (manager, _temp_dir) = temp_config_manager();
        let config = manager.load().unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_save_and_load() {
        let (manager, _temp_dir) = temp_config_manager();

        let mut config = Config::default();
        config.auth.username = Some("ada".to_string());
        config.auth.token = Some("cm_tok_123".to_string());
        config.workspace.username = Some("research-team".to_string());

        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded.auth.username.as_deref(), Some("ada"));
        assert_eq!(loaded.require_token().unwrap(), "cm_tok_123");
        assert_eq!(loaded.active_workspace().unwrap(), "research-team");
    }

    #[test]
    fn test_active_workspace_falls_back_to_login_user() {
        let mut config = Config::default();
        config.auth.username = Some("ada".to_string());
        assert_eq!(config.active_workspace().unwrap(), "ada");
    }
}
