//! Concurrent transfer engine
//!
//! Drives bulk upload/download of many objects between a dataset's local
//! root and its remote prefix. Each directory job runs one background
//! producer task that enumerates and transfers objects while the foreground
//! consumes typed progress events from a single ordered channel; the
//! producer's join handle carries the terminal success or failure.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::path;
use crate::project::DatasetBinding;
use crate::resolve::{self, ObjectKind};
use crate::traits::{DatasetRef, DatasetStore};

/// Capacity of the transfer event channel. A producer that gets this far
/// ahead of the display blocks until the display catches up, which bounds
/// buffered events on very large transfers.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Progress events emitted by a directory transfer producer.
///
/// `Started` arrives exactly once, before any `Object`. `Object` events
/// arrive in completion order, one per transferred object; no ordering is
/// guaranteed between objects. Channel closure marks the end of the stream;
/// the producer's return value is the terminal success or failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferEvent {
    /// Total number of objects in this transfer, reported as soon as it is known
    Started { total: u64 },
    /// One object finished transferring
    Object { key: String },
}

/// Rendering hooks for one directory transfer's aggregate progress.
///
/// Owned exclusively by the foreground consumer of one job; producers never
/// touch it.
pub trait DirectoryProgress: Send {
    /// The total is known; initialize the display. A zero total still
    /// initializes and is immediately complete.
    fn begin(&mut self, total: u64);

    /// One more object finished.
    fn object_done(&mut self, key: &str);

    /// The transfer ended, successfully or not.
    fn finish(&mut self);
}

/// Start/finish indicator bracketing a single-object transfer.
pub trait FileProgress: Send {
    fn begin(&mut self);
    fn finish(&mut self);
}

/// Creates progress displays for the jobs of one push/pull batch.
pub trait TransferReporter: Send + Sync {
    /// Display for a directory job, labelled `src -> dst`.
    fn directory(&self, description: &str) -> Box<dyn DirectoryProgress>;

    /// Display for a single-object job, with its in-flight and final messages.
    fn file(&self, active: &str, done: &str) -> Box<dyn FileProgress>;
}

/// Run one directory transfer to completion.
///
/// The producer owns the sending half of the event channel, so the receive
/// loop below ends exactly when the producer has terminated, successfully
/// or not. The join handle is awaited after the loop drains: the task is
/// never leaked, and an error that arrives after the last completion event
/// is still observed.
pub async fn run_directory<F, Fut>(producer: F, progress: &mut dyn DirectoryProgress) -> Result<()>
where
    F: FnOnce(mpsc::Sender<TransferEvent>) -> Fut,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let (events_tx, mut events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let producer = tokio::spawn(producer(events_tx));

    while let Some(event) = events_rx.recv().await {
        match event {
            TransferEvent::Started { total } => progress.begin(total),
            TransferEvent::Object { key } => progress.object_done(&key),
        }
    }

    let result = match producer.await {
        Ok(result) => result,
        Err(join_error) => Err(Error::Task(join_error.to_string())),
    };
    progress.finish();
    result
}

/// A resolved transfer job for one path argument.
#[derive(Debug, Clone)]
struct Job {
    /// Original argument string, `.` for the implicit current directory
    label: String,
    abs_path: std::path::PathBuf,
    remote_prefix: String,
}

/// Resolve and validate the whole argument batch up front. Every violation
/// is collected before failing so the user sees all invalid paths at once.
fn resolve_jobs(
    binding: &DatasetBinding,
    args: &[String],
    cwd: &Path,
    require_exists: bool,
) -> Result<Vec<Job>> {
    let abs_paths = path::to_absolute_paths(args, cwd);
    path::validate_within_root(&binding.root, args, &abs_paths, require_exists)
        .map_err(Error::InvalidPaths)?;
    let prefixes = path::to_remote_prefixes(&binding.root, &abs_paths);

    Ok(abs_paths
        .into_iter()
        .zip(prefixes)
        .enumerate()
        .map(|(i, (abs_path, remote_prefix))| Job {
            label: args.get(i).cloned().unwrap_or_else(|| ".".to_owned()),
            abs_path,
            remote_prefix,
        })
        .collect())
}

/// Display form of a remote prefix; the dataset root is shown as `.`
fn prefix_label(prefix: &str) -> &str {
    if prefix.is_empty() { "." } else { prefix }
}

/// Upload the argument paths to the dataset.
///
/// Jobs are processed sequentially, in argument order, so the progress
/// display is unambiguous. The first failing job aborts the remainder of
/// the batch; objects already transferred are not rolled back.
pub async fn push(
    store: Arc<dyn DatasetStore>,
    reporter: &dyn TransferReporter,
    binding: &DatasetBinding,
    args: &[String],
    cwd: &Path,
) -> Result<()> {
    let jobs = resolve_jobs(binding, args, cwd, true)?;
    let dataset = DatasetRef::new(binding.dataset_id.clone());
    tracing::debug!(dataset = %dataset, jobs = jobs.len(), "starting push");

    for job in &jobs {
        let label = format!("{} -> {}", job.label, prefix_label(&job.remote_prefix));
        let result = if job.abs_path.is_dir() {
            let mut progress = reporter.directory(&label);
            let producer = {
                let store = Arc::clone(&store);
                let dataset = dataset.clone();
                let local = job.abs_path.clone();
                let prefix = job.remote_prefix.clone();
                move |events| async move {
                    store.upload_directory(&dataset, &local, &prefix, events).await
                }
            };
            run_directory(producer, progress.as_mut()).await
        } else {
            let mut file = reporter.file(&format!("Uploading {label}"), &format!("Uploaded {label}"));
            file.begin();
            let result = store
                .upload_object(&dataset, &job.abs_path, &job.remote_prefix)
                .await;
            if result.is_ok() {
                file.finish();
            }
            result
        };
        result.map_err(|cause| Error::transfer(label, cause))?;
    }
    Ok(())
}

/// Download the argument paths from the dataset.
///
/// Every argument's remote prefix is classified before any data moves;
/// arguments resolving to nothing fail the batch together. Transfers then
/// run sequentially with the same first-error semantics as [`push`].
pub async fn pull(
    store: Arc<dyn DatasetStore>,
    reporter: &dyn TransferReporter,
    binding: &DatasetBinding,
    args: &[String],
    cwd: &Path,
) -> Result<()> {
    let jobs = resolve_jobs(binding, args, cwd, false)?;
    let dataset = DatasetRef::new(binding.dataset_id.clone());

    let mut kinds = Vec::with_capacity(jobs.len());
    for job in &jobs {
        kinds.push(resolve::resolve_kind(store.as_ref(), &dataset, &job.remote_prefix).await?);
    }
    let missing: Vec<String> = jobs
        .iter()
        .zip(&kinds)
        .filter(|(_, kind)| matches!(kind, ObjectKind::NotFound))
        .map(|(job, _)| job.label.clone())
        .collect();
    if !missing.is_empty() {
        return Err(Error::RemoteObjectsNotFound(missing));
    }
    tracing::debug!(dataset = %dataset, jobs = jobs.len(), "starting pull");

    for (job, kind) in jobs.iter().zip(kinds) {
        let label = format!("{} -> {}", prefix_label(&job.remote_prefix), job.label);
        let result = match kind {
            ObjectKind::Directory => {
                let mut progress = reporter.directory(&label);
                let producer = {
                    let store = Arc::clone(&store);
                    let dataset = dataset.clone();
                    let local = job.abs_path.clone();
                    let prefix = job.remote_prefix.clone();
                    move |events| async move {
                        store.download_directory(&dataset, &prefix, &local, events).await
                    }
                };
                run_directory(producer, progress.as_mut()).await
            }
            ObjectKind::File => pull_file(store.as_ref(), reporter, &dataset, job, &label).await,
            ObjectKind::NotFound => unreachable!("not-found arguments fail the batch above"),
        };
        result.map_err(|cause| Error::transfer(label, cause))?;
    }
    Ok(())
}

async fn pull_file(
    store: &dyn DatasetStore,
    reporter: &dyn TransferReporter,
    dataset: &DatasetRef,
    job: &Job,
    label: &str,
) -> Result<()> {
    if let Some(parent) = job.abs_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut file = reporter.file(&format!("Downloading {label}"), &format!("Downloaded {label}"));
    file.begin();
    store
        .download_object(dataset, &job.remote_prefix, &job.abs_path)
        .await?;
    file.finish();
    Ok(())
}
