//! Project configuration and dataset bindings
//!
//! A project is a directory tree marked by a `cumulus.toml` file at its
//! root. Dataset entries in that file bind subdirectories of the project to
//! remote data storages; transfer commands look their binding up by walking
//! from the current working directory upward.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path;

/// File name marking a project root
pub const PROJECT_FILENAME: &str = "cumulus.toml";

/// Project configuration (`cumulus.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// The platform project this directory belongs to
    #[serde(default)]
    pub project: ProjectSection,

    /// Dataset bindings by dataset name
    #[serde(default)]
    pub datasets: BTreeMap<String, DatasetEntry>,

    /// Path of the loaded config file; not part of the file itself
    #[serde(skip)]
    pub config_file: PathBuf,
}

/// `[project]` section of the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSection {
    pub id: String,
    pub name: String,
}

/// One `[datasets.<name>]` entry: a remote data storage bound to a local
/// directory expressed relative to the project root, POSIX-style.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub id: String,
    pub local_directory: String,
}

impl ProjectConfig {
    /// Walk up from `start` looking for a project config file.
    pub fn discover(start: &Path) -> Result<Self> {
        let mut dir = Some(start);
        while let Some(current) = dir {
            let candidate = current.join(PROJECT_FILENAME);
            if candidate.is_file() {
                return Self::load(&candidate);
            }
            dir = current.parent();
        }
        Err(Error::NotAProject)
    }

    /// Load a project config from a known file path.
    pub fn load(file: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(file)?;
        let mut config: ProjectConfig = toml::from_str(&content)?;
        config.config_file = file.to_path_buf();
        Ok(config)
    }

    /// Write the config back to the file it was loaded from (or was
    /// assigned for a fresh project).
    pub fn save(&self) -> Result<()> {
        if self.config_file.as_os_str().is_empty() {
            return Err(Error::Config(
                "project config has no file path to save to".into(),
            ));
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.config_file, content)?;
        Ok(())
    }

    /// Directory that owns this config file.
    pub fn project_dir(&self) -> &Path {
        self.config_file.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Absolute root directory of a dataset entry.
    pub fn dataset_root(&self, entry: &DatasetEntry) -> PathBuf {
        path::normalize(&self.project_dir().join(&entry.local_directory))
    }
}

/// A local directory bound to one remote dataset. Never mutated after
/// resolution, only read by the transfer engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetBinding {
    /// Remote data storage ID
    pub dataset_id: String,
    /// Absolute local root all transfer paths are expressed against
    pub root: PathBuf,
}

/// Find the dataset binding whose root directory contains `cwd`.
///
/// Containment uses the strict relative-path test from [`path::is_within`];
/// failing to find a binding short-circuits any transfer command.
pub fn resolve_binding(config: &ProjectConfig, cwd: &Path) -> Result<DatasetBinding> {
    for entry in config.datasets.values() {
        let root = config.dataset_root(entry);
        if path::is_within(&root, cwd) {
            return Ok(DatasetBinding {
                dataset_id: entry.id.clone(),
                root,
            });
        }
    }
    Err(Error::NotADataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_project(dir: &Path) -> PathBuf {
        let file = dir.join(PROJECT_FILENAME);
        std::fs::write(
            &file,
            r#"
[project]
id = "prj_1"
name = "vision"

[datasets.raw-images]
id = "ds_1"
local_directory = "data/raw"

[datasets.labels]
id = "ds_2"
local_directory = "data/labels"
"#,
        )
        .unwrap();
        file
    }

    #[test]
    fn test_discover_walks_upward() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path());
        let nested = dir.path().join("data/raw/train");
        std::fs::create_dir_all(&nested).unwrap();

        let config = ProjectConfig::discover(&nested).unwrap();
        assert_eq!(config.project.name, "vision");
        assert_eq!(config.project_dir(), dir.path());
        assert_eq!(config.datasets.len(), 2);
    }

    #[test]
    fn test_discover_fails_outside_a_project() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProjectConfig::discover(dir.path()).unwrap_err();
        assert!(matches!(err, Error::NotAProject));
    }

    #[test]
    fn test_resolve_binding_picks_the_containing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_project(dir.path());
        let config = ProjectConfig::load(&file).unwrap();

        let cwd = dir.path().join("data/raw/train");
        let binding = resolve_binding(&config, &cwd).unwrap();
        assert_eq!(binding.dataset_id, "ds_1");
        assert_eq!(binding.root, path::normalize(&dir.path().join("data/raw")));

        // the dataset root itself is inside the binding
        let binding = resolve_binding(&config, &dir.path().join("data/labels")).unwrap();
        assert_eq!(binding.dataset_id, "ds_2");
    }

    #[test]
    fn test_resolve_binding_rejects_unbound_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_project(dir.path());
        let config = ProjectConfig::load(&file).unwrap();

        let err = resolve_binding(&config, dir.path()).unwrap_err();
        assert!(matches!(err, Error::NotADataset));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_project(dir.path());
        let mut config = ProjectConfig::load(&file).unwrap();

        config.datasets.insert(
            "embeddings".to_string(),
            DatasetEntry {
                id: "ds_3".to_string(),
                local_directory: "data/embeddings".to_string(),
            },
        );
        config.save().unwrap();

        let reloaded = ProjectConfig::load(&file).unwrap();
        assert_eq!(reloaded.datasets.len(), 3);
        assert_eq!(reloaded.datasets["embeddings"].id, "ds_3");
    }
}
