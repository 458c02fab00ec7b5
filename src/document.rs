//! Map documents: load a config map from disk and render it back.
//!
//! Documents are a small YAML subset, one mapping per option with `type`, `value`,
//! `action` and optional `source` keys. Rendering is deterministic and quotes every
//! string so that loading a rendered document reproduces the map exactly.
//! Neither direction touches the option store.

pub mod load;
pub mod render;

pub use load::{load, parse};
pub use render::{header_line, render};

use crate::entry::ConfigMap;
use crate::error::ApiError;
use std::path::Path;

/// Render `map` and write it to `path`, creating parent directories as needed.
pub fn write(path: &Path, map: &ConfigMap, header: &str) -> Result<(), ApiError> {
    write_text(path, &render(map, header))
}

/// Write already rendered document text to `path`, creating parent directories.
pub fn write_text(path: &Path, text: &str) -> Result<(), ApiError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| ApiError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    std::fs::write(path, text).map_err(|source| ApiError::Io {
        path: path.to_path_buf(),
        source,
    })
}
