//! Platform API data transfer objects

use serde::{Deserialize, Serialize};

/// The authenticated account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
}

/// A workspace the user can operate in (their personal account or a team)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub username: String,

    /// Team workspaces are shared; personal ones are not
    #[serde(default)]
    pub is_team: bool,
}

/// A project in a workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<jiff::Timestamp>,
}

/// Cloud vendor backing a profile. A closed set, fixed when the profile is
/// created on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Provider {
    Aws,
    Azure,
    Gcp,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Provider::Aws => "AWS",
            Provider::Azure => "AZURE",
            Provider::Gcp => "GCP",
        };
        write!(f, "{name}")
    }
}

/// Credentials container a workspace uses to reach one cloud vendor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudProfile {
    pub id: String,
    pub name: String,
    pub provider: Provider,
}

/// Deployment state of a data storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataStorageStatus {
    DeploySuccess,
    DeployPending,
    DeployError,
}

/// A dataset's remote storage as the platform reports it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataStorage {
    pub id: String,
    pub name: String,
    pub status: DataStorageStatus,
}

impl DataStorage {
    /// Only successfully deployed storages can be bound and transferred to
    pub fn is_ready(&self) -> bool {
        self.status == DataStorageStatus::DeploySuccess
    }
}

/// Short-lived credentials for a dataset's backing object storage
#[derive(Debug, Clone, Deserialize)]
pub struct StorageCredentials {
    pub endpoint: String,
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,

    #[serde(default)]
    pub session_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_wire_format() {
        let provider: Provider = serde_json::from_str("\"AWS\"").unwrap();
        assert_eq!(provider, Provider::Aws);
        assert_eq!(serde_json::to_string(&Provider::Gcp).unwrap(), "\"GCP\"");
    }

    #[test]
    fn test_data_storage_readiness() {
        let storage: DataStorage = serde_json::from_str(
            r#"{"id": "ds_1", "name": "images", "status": "DEPLOY_SUCCESS"}"#,
        )
        .unwrap();
        assert!(storage.is_ready());

        let storage: DataStorage = serde_json::from_str(
            r#"{"id": "ds_2", "name": "wip", "status": "DEPLOY_PENDING"}"#,
        )
        .unwrap();
        assert!(!storage.is_ready());
    }

    #[test]
    fn test_storage_credentials_session_token_is_optional() {
        let credentials: StorageCredentials = serde_json::from_str(
            r#"{
                "endpoint": "https://s3.us-east-1.amazonaws.com",
                "bucket": "cumulus-ds-1",
                "region": "us-east-1",
                "access_key": "AKIA...",
                "secret_key": "secret"
            }"#,
        )
        .unwrap();
        assert!(credentials.session_token.is_none());
    }
}
