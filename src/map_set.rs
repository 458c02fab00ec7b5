//! Named Map Set: the ordered list of config map documents known to this workspace.
//!
//! Order is significant. Later maps override earlier ones during merge, and the first
//! map is the one that absorbs newly discovered options on refresh.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One named map and where its document lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapLocation {
    pub id: String,
    pub path: PathBuf,
}

impl MapLocation {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapSet {
    maps: Vec<MapLocation>,
}

impl MapSet {
    pub fn new(maps: Vec<MapLocation>) -> Self {
        Self { maps }
    }

    /// Build a map set with relative document paths resolved against `root`.
    pub fn resolved(maps: &[MapLocation], root: &Path) -> Self {
        let maps = maps
            .iter()
            .map(|m| MapLocation {
                id: m.id.clone(),
                path: if m.path.is_absolute() {
                    m.path.clone()
                } else {
                    root.join(&m.path)
                },
            })
            .collect();
        Self { maps }
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MapLocation> {
        self.maps.iter()
    }

    pub fn as_slice(&self) -> &[MapLocation] {
        &self.maps
    }

    /// Fail with `EmptyMapSet` when no maps are configured.
    pub fn require_maps(&self) -> Result<&[MapLocation], ApiError> {
        if self.maps.is_empty() {
            Err(ApiError::EmptyMapSet)
        } else {
            Ok(&self.maps)
        }
    }

    /// Look up a map by id.
    pub fn resolve(&self, id: &str) -> Result<&MapLocation, ApiError> {
        self.require_maps()?;
        self.maps
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| ApiError::UnknownMapId(id.to_string()))
    }

    /// True when `id` names the first (lowest-priority) map.
    pub fn is_first(&self, id: &str) -> bool {
        self.maps.first().map(|m| m.id == id).unwrap_or(false)
    }
}
