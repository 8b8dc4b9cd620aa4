//! Platform REST API client
//!
//! Thin JSON-over-HTTP wrapper around the platform endpoints. Calls are
//! single-shot; the platform gateway provides its own resilience, so no
//! retry layer is added here.

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;

use cm_core::{Error, Result};

use crate::models::{
    CloudProfile, DataStorage, Project, StorageCredentials, User, Workspace,
};

/// Client for the Cumulus platform REST API
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: url::Url,
    token: String,
}

impl ApiClient {
    /// Create a client for the given endpoint and personal access token.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self> {
        // a trailing slash makes Url::join treat the path as a directory
        let base_url = if base_url.ends_with('/') {
            url::Url::parse(base_url)?
        } else {
            url::Url::parse(&format!("{base_url}/"))?
        };
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            token: token.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<url::Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        tracing::debug!(path, "api get");
        let response = self
            .http
            .get(self.endpoint(path)?)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        tracing::debug!(path, "api post");
        let response = self
            .http
            .post(self.endpoint(path)?)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| Error::Network(format!("malformed response: {e}")));
        }

        let path = response.url().path().to_owned();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(Error::Auth("the platform rejected the access token".into()))
            }
            StatusCode::NOT_FOUND => Err(Error::NotFound(path)),
            StatusCode::CONFLICT => Err(Error::Conflict(path)),
            _ => Err(Error::Network(format!("{path}: unexpected status {status}"))),
        }
    }

    /// The account the token belongs to; doubles as token verification.
    pub async fn user(&self) -> Result<User> {
        self.get("v1/user").await
    }

    /// Workspaces the user can operate in.
    pub async fn workspaces(&self) -> Result<Vec<Workspace>> {
        self.get("v1/workspaces").await
    }

    /// Projects in a workspace.
    pub async fn projects(&self, workspace: &str) -> Result<Vec<Project>> {
        self.get(&format!("v1/workspaces/{workspace}/projects")).await
    }

    /// Create a project in a workspace.
    pub async fn create_project(&self, workspace: &str, name: &str) -> Result<Project> {
        self.post(
            &format!("v1/workspaces/{workspace}/projects"),
            &serde_json::json!({ "name": name }),
        )
        .await
    }

    /// Cloud profiles of a workspace.
    pub async fn cloud_profiles(&self, workspace: &str) -> Result<Vec<CloudProfile>> {
        self.get(&format!("v1/workspaces/{workspace}/cloud-profiles"))
            .await
    }

    /// Data storages attached to a project.
    pub async fn data_storages(&self, workspace: &str, project_id: &str) -> Result<Vec<DataStorage>> {
        self.get(&format!(
            "v1/workspaces/{workspace}/projects/{project_id}/data-storages"
        ))
        .await
    }

    /// Issue short-lived credentials for a dataset's backing store.
    pub async fn storage_credentials(&self, dataset_id: &str) -> Result<StorageCredentials> {
        self.post(
            &format!("v1/data-storages/{dataset_id}/credentials"),
            &serde_json::json!({}),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_onto_bare_host() {
        let client = ApiClient::new("https://api.cumulus-ml.com", "tok").unwrap();
        assert_eq!(
            client.endpoint("v1/user").unwrap().as_str(),
            "https://api.cumulus-ml.com/v1/user"
        );
    }

    #[test]
    fn test_endpoint_preserves_base_path() {
        // a self-hosted gateway mounted under a path prefix
        let client = ApiClient::new("https://internal.example.com/cumulus", "tok").unwrap();
        assert_eq!(
            client.endpoint("v1/workspaces").unwrap().as_str(),
            "https://internal.example.com/cumulus/v1/workspaces"
        );
    }

    #[test]
    fn test_new_rejects_garbage_urls() {
        assert!(ApiClient::new("not a url", "tok").is_err());
    }
}
