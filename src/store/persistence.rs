//! Persistence layer for the Option Store

use crate::error::StorageError;
use crate::store::OptionStore;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

const OPTIONS_TREE: &str = "options";

/// Sled-based implementation of OptionStore
///
/// Option names are the keys of the `options` tree; values are stored as JSON.
pub struct SledOptionStore {
    db: sled::Db,
    options: sled::Tree,
}

impl SledOptionStore {
    /// Open (or create) the store at the given directory.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let db = sled::open(path).map_err(|e| StorageError::OpenFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_db(db, path.to_path_buf())
    }

    fn from_db(db: sled::Db, path: PathBuf) -> Result<Self, StorageError> {
        let options = db
            .open_tree(OPTIONS_TREE)
            .map_err(|e| StorageError::OpenFailed {
                path,
                reason: e.to_string(),
            })?;
        Ok(Self { db, options })
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush().map_err(|e| {
            StorageError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to flush database: {}", e),
            ))
        })?;
        Ok(())
    }
}

impl OptionStore for SledOptionStore {
    fn list_keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        for item in self.options.iter().keys() {
            let key = item.map_err(|e| StorageError::ReadFailed {
                key: "*".to_string(),
                reason: e.to_string(),
            })?;
            keys.push(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(keys)
    }

    fn get(&self, name: &str) -> Result<Option<Value>, StorageError> {
        let raw = self
            .options
            .get(name.as_bytes())
            .map_err(|e| StorageError::ReadFailed {
                key: name.to_string(),
                reason: e.to_string(),
            })?;
        match raw {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes).map_err(|e| {
                    StorageError::InvalidValue {
                        key: name.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn set(&self, name: &str, value: &Value) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(value).map_err(|e| StorageError::InvalidValue {
            key: name.to_string(),
            reason: e.to_string(),
        })?;
        self.options
            .insert(name.as_bytes(), bytes)
            .map_err(|e| StorageError::WriteFailed {
                key: name.to_string(),
                reason: e.to_string(),
            })?;
        debug!(option = name, "Stored option");
        Ok(())
    }
}
