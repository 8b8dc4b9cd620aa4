//! DatasetStore trait definition
//!
//! Interface for the object-storage operations backing a dataset. It keeps
//! the transfer engine independent of any particular storage SDK or
//! platform API, and mockable in tests.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::transfer::TransferEvent;

/// Reference to a remote dataset (data storage) by its platform ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRef {
    pub id: String,
}

impl DatasetRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl std::fmt::Display for DatasetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Metadata for one stored object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectEntry {
    /// Full object key
    pub key: String,

    /// Size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<jiff::Timestamp>,
}

impl ObjectEntry {
    /// Entry with only a key, for tests and synthetic listings
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size_bytes: None,
            last_modified: None,
        }
    }
}

/// One page of an object listing
#[derive(Debug, Clone, Default)]
pub struct ObjectPage {
    /// Listed objects
    pub objects: Vec<ObjectEntry>,

    /// Token for the next page; `None` when the listing is exhausted
    pub next_token: Option<String>,
}

/// Options for a listing request
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Key prefix to filter by
    pub prefix: Option<String>,

    /// Maximum number of keys to return for this page
    pub max_keys: Option<i32>,

    /// Continuation token from the previous page
    pub continuation_token: Option<String>,
}

/// Object-storage operations for one dataset.
///
/// Directory transfers report progress over the given event channel: one
/// `Started { total }` before anything else, then one `Object` per
/// transferred object in completion order. The method's return value is the
/// terminal success or failure; implementations stop issuing new work after
/// the first error. Implementations provide their own retry behavior; the
/// engine does not re-wrap calls in retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// List one page of objects
    async fn list_objects(&self, dataset: &DatasetRef, options: ListOptions)
    -> Result<ObjectPage>;

    /// Upload a single local file to `key`
    async fn upload_object(&self, dataset: &DatasetRef, local: &Path, key: &str) -> Result<()>;

    /// Download the object at `key` to a local file
    async fn download_object(&self, dataset: &DatasetRef, key: &str, local: &Path) -> Result<()>;

    /// Upload every file under `local_root` beneath the remote `prefix`
    async fn upload_directory(
        &self,
        dataset: &DatasetRef,
        local_root: &Path,
        prefix: &str,
        events: mpsc::Sender<TransferEvent>,
    ) -> Result<()>;

    /// Download every object under `prefix` into `local_root`
    async fn download_directory(
        &self,
        dataset: &DatasetRef,
        prefix: &str,
        local_root: &Path,
        events: mpsc::Sender<TransferEvent>,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_entry_key_constructor() {
        let entry = ObjectEntry::key("raw/img.png");
        assert_eq!(entry.key, "raw/img.png");
        assert!(entry.size_bytes.is_none());
        assert!(entry.last_modified.is_none());
    }

    #[test]
    fn test_dataset_ref_display() {
        assert_eq!(DatasetRef::new("ds_42").to_string(), "ds_42");
    }
}
