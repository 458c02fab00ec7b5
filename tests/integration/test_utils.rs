//! Shared test utilities for integration tests
//!
//! Builds throwaway workspaces with map documents on disk.

use optmap::api::ConfigMapApi;
use optmap::document;
use optmap::entry::ConfigMap;
use optmap::map_set::{MapLocation, MapSet};
use optmap::store::MemoryOptionStore;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// A temp directory holding map documents, plus the map set pointing at them.
pub struct MapWorkspace {
    pub dir: TempDir,
    pub maps: Vec<MapLocation>,
}

impl MapWorkspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            maps: Vec::new(),
        }
    }

    /// Write `map` as `maps/{id}.yaml` and append it to the map set.
    pub fn add_map(&mut self, id: &str, map: &ConfigMap) -> PathBuf {
        let path = self.dir.path().join("maps").join(format!("{}.yaml", id));
        document::write(&path, map, "test fixture").unwrap();
        self.maps.push(MapLocation::new(id, &path));
        path
    }

    /// Append a map whose document text is given verbatim.
    pub fn add_raw_map(&mut self, id: &str, text: &str) -> PathBuf {
        let path = self.dir.path().join("maps").join(format!("{}.yaml", id));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, text).unwrap();
        self.maps.push(MapLocation::new(id, &path));
        path
    }

    pub fn api(&self, store: Arc<MemoryOptionStore>) -> ConfigMapApi {
        ConfigMapApi::new(MapSet::new(self.maps.clone()), store)
    }
}
