//! cm-api: network adapters for the Cumulus CLI
//!
//! This crate owns all network I/O:
//! - `ApiClient` talks to the platform's REST API (account, workspaces,
//!   projects, cloud profiles, data storages, storage credentials).
//! - `StorageClient` implements the `cm_core::DatasetStore` trait against a
//!   dataset's backing object storage, using short-lived credentials issued
//!   by the platform.

pub mod client;
pub mod models;
pub mod storage;

pub use client::ApiClient;
pub use models::{
    CloudProfile, DataStorage, DataStorageStatus, Project, Provider, StorageCredentials, User,
    Workspace,
};
pub use storage::StorageClient;
