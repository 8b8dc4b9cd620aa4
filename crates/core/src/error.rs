//! Error types for cm-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for cm-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cm-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No project config found walking up from the current directory
    #[error("No project found: the current directory is not inside an initialised project")]
    NotAProject,

    /// No dataset binding contains the current directory
    #[error("The current directory is not initialised as a dataset")]
    NotADataset,

    /// One or more path arguments escape the dataset root (or, for push, do
    /// not exist locally). Carries every offending argument as typed.
    #[error("Invalid paths: {}", .0.join(", "))]
    InvalidPaths(Vec<String>),

    /// Pull arguments whose remote prefixes resolve to nothing
    #[error("No objects found in paths: {}", .0.join(", "))]
    RemoteObjectsNotFound(Vec<String>),

    /// First failure of a transfer job, naming the pair being moved
    #[error("Transfer failed ({label}): {cause}")]
    Transfer {
        label: String,
        #[source]
        cause: Box<Error>,
    },

    /// A background transfer task died without reporting
    #[error("Transfer task failed: {0}")]
    Task(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network error (retryable)
    #[error("Network error: {0}")]
    Network(String),

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Wrap the first error of a transfer job with its source -> destination label
    pub fn transfer(label: impl Into<String>, cause: Error) -> Self {
        Error::Transfer {
            label: label.into(),
            cause: Box::new(cause),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 2,          // UsageError
            Error::NotAProject => 2,        // UsageError
            Error::NotADataset => 2,        // UsageError
            Error::InvalidPaths(_) => 2,    // UsageError
            Error::InvalidUrl(_) => 2,      // UsageError
            Error::Network(_) => 3,         // NetworkError
            Error::Auth(_) => 4,            // AuthError
            Error::NotFound(_) | Error::RemoteObjectsNotFound(_) => 5, // NotFound
            Error::Conflict(_) => 6,        // Conflict
            Error::Transfer { cause, .. } => cause.exit_code(),
            _ => 1,                         // GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::NotAProject.exit_code(), 2);
        assert_eq!(Error::NotADataset.exit_code(), 2);
        assert_eq!(Error::InvalidPaths(vec!["../x".into()]).exit_code(), 2);
        assert_eq!(Error::Network("test".into()).exit_code(), 3);
        assert_eq!(Error::Auth("test".into()).exit_code(), 4);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 5);
        assert_eq!(
            Error::RemoteObjectsNotFound(vec!["a".into()]).exit_code(),
            5
        );
        assert_eq!(Error::Conflict("test".into()).exit_code(), 6);
        assert_eq!(Error::General("test".into()).exit_code(), 1);
    }

    #[test]
    fn test_transfer_error_keeps_cause_exit_code() {
        let err = Error::transfer("data -> raw", Error::Network("timed out".into()));
        assert_eq!(err.exit_code(), 3);

        let err = Error::transfer("data -> raw", Error::General("oops".into()));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidPaths(vec!["../escape".into(), "gone".into()]);
        assert_eq!(err.to_string(), "Invalid paths: ../escape, gone");

        let err = Error::RemoteObjectsNotFound(vec!["models/v2".into()]);
        assert_eq!(err.to_string(), "No objects found in paths: models/v2");

        let err = Error::transfer("weights.bin -> weights.bin", Error::Network("reset".into()));
        assert_eq!(
            err.to_string(),
            "Transfer failed (weights.bin -> weights.bin): Network error: reset"
        );
    }
}
