//! Configuration System
//!
//! Layered configuration for the workspace: which config maps exist and in what order,
//! where the option store lives, and how logging behaves. Sources are merged with the
//! `config` crate (defaults, global file, workspace files, environment).

use crate::logging::LoggingConfig;
use crate::map_set::{MapLocation, MapSet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptmapConfig {
    /// Named map set, lowest priority first
    #[serde(default)]
    pub maps: Vec<MapLocation>,

    /// Option store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Option store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Sled database directory (relative paths resolve against the workspace root)
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".optmap/store")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl StoreConfig {
    pub fn resolve_path(&self, workspace_root: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            workspace_root.join(&self.path)
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Map(String, String),
    Store(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Map(id, msg) => write!(f, "Map '{}': {}", id, msg),
            ValidationError::Store(msg) => write!(f, "Store: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl OptmapConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for map in &self.maps {
            if map.id.trim().is_empty() {
                errors.push(ValidationError::Map(
                    map.id.clone(),
                    "Map id cannot be empty".to_string(),
                ));
            } else if !seen.insert(map.id.as_str()) {
                errors.push(ValidationError::Map(
                    map.id.clone(),
                    "Duplicate map id".to_string(),
                ));
            }
            if map.path.as_os_str().is_empty() {
                errors.push(ValidationError::Map(
                    map.id.clone(),
                    "Map path cannot be empty".to_string(),
                ));
            }
        }

        if self.store.path.as_os_str().is_empty() {
            errors.push(ValidationError::Store(
                "Store path cannot be empty".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// The named map set with document paths resolved against `workspace_root`.
    pub fn map_set(&self, workspace_root: &Path) -> MapSet {
        MapSet::resolved(&self.maps, workspace_root)
    }
}
