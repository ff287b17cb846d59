//! Data file handle and (de)serialization.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::models::PluginData;
use crate::error::StorageError;

/// File name used when the store lives in a data directory.
pub const DATA_FILE_NAME: &str = "LifeSupport.json";

/// Handle to the persisted plugin data file.
///
/// Reads once at startup; every mutation rewrites the whole file.
#[derive(Debug, Clone)]
pub struct DataStore {
    path: PathBuf,
}

impl DataStore {
    /// Open a store at the given path, creating the parent directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        Ok(Self { path })
    }

    /// Open `LifeSupport.json` inside a data directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::open(dir.as_ref().join(DATA_FILE_NAME))
    }

    /// Load the data. A missing file is empty state.
    pub fn load(&self) -> Result<PluginData, StorageError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no data file yet, starting empty");
            return Ok(PluginData::default());
        }

        let raw = std::fs::read_to_string(&self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| StorageError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrite the data file.
    pub fn save(&self, data: &PluginData) -> Result<(), StorageError> {
        let rendered = serde_json::to_string_pretty(data).map_err(StorageError::Serialize)?;
        std::fs::write(&self.path, rendered).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(
            path = %self.path.display(),
            activated = data.activated_ids.len(),
            zones = data.excluded_zones.len(),
            "saved plugin data"
        );
        Ok(())
    }

    /// Get the data file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
