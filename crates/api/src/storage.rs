//! Object storage adapter
//!
//! Implements `cm_core::DatasetStore` against a dataset's backing
//! S3-compatible store, using short-lived credentials issued by the
//! platform. Directory transfers enumerate the full object set first,
//! report the total, then move objects with bounded concurrency.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use aws_smithy_types::byte_stream::ByteStream;
use futures::stream::{self, TryStreamExt};
use tokio::sync::mpsc;
use walkdir::WalkDir;

use cm_core::{
    DatasetRef, DatasetStore, Error, ListOptions, ObjectEntry, ObjectPage, Result, TransferEvent,
};

use crate::models::StorageCredentials;

/// Objects moved concurrently within one directory job. Completion events
/// therefore arrive in completion order, not enumeration order.
const TRANSFER_CONCURRENCY: usize = 8;

/// Page size for bulk listings during directory downloads
const LIST_PAGE_SIZE: i32 = 1000;

/// S3 client bound to one dataset's bucket
pub struct StorageClient {
    inner: aws_sdk_s3::Client,
    bucket: String,
}

impl StorageClient {
    /// Build a client from platform-issued credentials.
    pub async fn new(credentials: StorageCredentials) -> Result<Self> {
        let creds = aws_credential_types::Credentials::new(
            credentials.access_key,
            credentials.secret_key,
            credentials.session_token,
            None, // expiry is enforced server-side
            "cumulus-platform",
        );

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(creds)
            .region(aws_config::Region::new(credentials.region))
            .endpoint_url(&credentials.endpoint)
            .load()
            .await;

        // Path-style addressing works for every gateway the platform fronts
        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(true)
            .build();

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: credentials.bucket,
        })
    }
}

/// Directory form of a prefix: guaranteed trailing separator (empty stays
/// empty, meaning the whole dataset).
fn directory_prefix(prefix: &str) -> String {
    if prefix.is_empty() || prefix.ends_with('/') {
        prefix.to_owned()
    } else {
        format!("{prefix}/")
    }
}

/// Append a forward-slash relative path to a key prefix
fn join_key(prefix: &str, relative: &str) -> String {
    if prefix.is_empty() {
        relative.to_owned()
    } else {
        format!("{prefix}/{relative}")
    }
}

/// Every regular file under `root`, paired with its object key beneath
/// `prefix`. Symlinks are followed; keys use forward slashes regardless of
/// the local path convention.
fn enumerate_local(root: &Path, prefix: &str) -> Result<Vec<(PathBuf, String)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| Error::General(e.to_string()))?
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        files.push((entry.path().to_path_buf(), join_key(prefix, &relative)));
    }
    Ok(files)
}

#[async_trait]
impl DatasetStore for StorageClient {
    async fn list_objects(
        &self,
        dataset: &DatasetRef,
        options: ListOptions,
    ) -> Result<ObjectPage> {
        tracing::debug!(dataset = %dataset, prefix = ?options.prefix, "listing objects");

        let mut request = self.inner.list_objects_v2().bucket(&self.bucket);
        if let Some(prefix) = &options.prefix {
            request = request.prefix(prefix);
        }
        if let Some(max) = options.max_keys {
            request = request.max_keys(max);
        }
        if let Some(token) = &options.continuation_token {
            request = request.continuation_token(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let objects = response
            .contents()
            .iter()
            .map(|object| ObjectEntry {
                key: object.key().unwrap_or_default().to_owned(),
                size_bytes: object.size(),
                last_modified: object
                    .last_modified()
                    .and_then(|t| jiff::Timestamp::from_second(t.secs()).ok()),
            })
            .collect();

        Ok(ObjectPage {
            objects,
            next_token: response.next_continuation_token().map(str::to_owned),
        })
    }

    async fn upload_object(&self, dataset: &DatasetRef, local: &Path, key: &str) -> Result<()> {
        tracing::debug!(dataset = %dataset, key, "uploading object");

        let body = ByteStream::from_path(local)
            .await
            .map_err(|e| Error::General(format!("failed to read {}: {e}", local.display())))?;

        let mut request = self
            .inner
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body);
        if let Some(mime) = mime_guess::from_path(local).first() {
            request = request.content_type(mime.essence_str());
        }

        request
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        Ok(())
    }

    async fn download_object(&self, dataset: &DatasetRef, key: &str, local: &Path) -> Result<()> {
        tracing::debug!(dataset = %dataset, key, "downloading object");

        if let Some(parent) = local.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let response = self
            .inner
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let message = e.to_string();
                if message.contains("NoSuchKey") || message.contains("NotFound") {
                    Error::NotFound(key.to_owned())
                } else {
                    Error::Network(message)
                }
            })?;

        let mut body = response.body.into_async_read();
        let mut file = tokio::fs::File::create(local).await?;
        tokio::io::copy(&mut body, &mut file).await?;
        Ok(())
    }

    async fn upload_directory(
        &self,
        dataset: &DatasetRef,
        local_root: &Path,
        prefix: &str,
        events: mpsc::Sender<TransferEvent>,
    ) -> Result<()> {
        let files = enumerate_local(local_root, prefix)?;
        // channel closure means the consumer is gone; the transfer result
        // is still reported through the return value
        let _ = events
            .send(TransferEvent::Started {
                total: files.len() as u64,
            })
            .await;

        stream::iter(files.into_iter().map(Ok))
            .try_for_each_concurrent(TRANSFER_CONCURRENCY, |(local, key)| {
                let events = events.clone();
                async move {
                    self.upload_object(dataset, &local, &key).await?;
                    let _ = events.send(TransferEvent::Object { key }).await;
                    Ok(())
                }
            })
            .await
    }

    async fn download_directory(
        &self,
        dataset: &DatasetRef,
        prefix: &str,
        local_root: &Path,
        events: mpsc::Sender<TransferEvent>,
    ) -> Result<()> {
        let dir_prefix = directory_prefix(prefix);

        // Drain the paginated listing first; the total is reported as soon
        // as it is known.
        let mut keys = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let page = self
                .list_objects(
                    dataset,
                    ListOptions {
                        prefix: (!dir_prefix.is_empty()).then(|| dir_prefix.clone()),
                        max_keys: Some(LIST_PAGE_SIZE),
                        continuation_token: token.take(),
                    },
                )
                .await?;
            keys.extend(page.objects.into_iter().map(|object| object.key));
            match page.next_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        let _ = events
            .send(TransferEvent::Started {
                total: keys.len() as u64,
            })
            .await;

        let dir_prefix = &dir_prefix;
        stream::iter(keys.into_iter().map(Ok))
            .try_for_each_concurrent(TRANSFER_CONCURRENCY, |key| {
                let events = events.clone();
                async move {
                    let relative = key.strip_prefix(dir_prefix.as_str()).unwrap_or(&key);
                    let local =
                        local_root.join(relative.replace('/', std::path::MAIN_SEPARATOR_STR));
                    self.download_object(dataset, &key, &local).await?;
                    let _ = events.send(TransferEvent::Object { key }).await;
                    Ok(())
                }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_prefix_normalization() {
        assert_eq!(directory_prefix("a"), "a/");
        assert_eq!(directory_prefix("a/"), "a/");
        assert_eq!(directory_prefix(""), "");
    }

    #[test]
    fn test_join_key() {
        assert_eq!(join_key("", "x/y.bin"), "x/y.bin");
        assert_eq!(join_key("raw", "x/y.bin"), "raw/x/y.bin");
    }

    #[test]
    fn test_enumerate_local_builds_forward_slash_keys() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("a/b")).unwrap();
        std::fs::write(dir.path().join("top.txt"), b"1").unwrap();
        std::fs::write(dir.path().join("a/b/deep.txt"), b"2").unwrap();

        let mut files = enumerate_local(dir.path(), "train").unwrap();
        files.sort_by(|x, y| x.1.cmp(&y.1));

        let keys: Vec<&str> = files.iter().map(|(_, key)| key.as_str()).collect();
        assert_eq!(keys, vec!["train/a/b/deep.txt", "train/top.txt"]);
        assert!(files.iter().all(|(path, _)| path.is_file()));
    }

    #[test]
    fn test_enumerate_local_empty_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let files = enumerate_local(dir.path(), "").unwrap();
        assert!(files.is_empty());
    }
}
