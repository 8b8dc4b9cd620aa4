//! cm-core: Core library for the Cumulus CLI
//!
//! This crate provides the domain logic for the Cumulus CLI, including:
//! - Root and project configuration management
//! - Dataset bindings and local/remote path mapping
//! - Remote object kind resolution
//! - The concurrent push/pull transfer engine
//!
//! It is independent of any storage SDK or platform API: all network I/O
//! goes through the `DatasetStore` trait, which keeps the engine testable
//! and the adapters swappable.

pub mod config;
pub mod error;
pub mod path;
pub mod project;
pub mod resolve;
pub mod traits;
pub mod transfer;

pub use config::{Config, ConfigManager, DEFAULT_API_URL};
pub use error::{Error, Result};
pub use project::{DatasetBinding, DatasetEntry, ProjectConfig, resolve_binding};
pub use resolve::{ObjectKind, resolve_kind};
pub use traits::{DatasetRef, DatasetStore, ListOptions, ObjectEntry, ObjectPage};
pub use transfer::{
    DirectoryProgress, FileProgress, TransferEvent, TransferReporter, pull, push, run_directory,
};
