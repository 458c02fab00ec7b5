//! Config map operations
//!
//! The surface exposed to front ends: generate, list, show, reconcile and refresh.
//! Every operation takes the named map set and the option store explicitly; nothing
//! here reads global state. Errors that concern the request itself (unknown map id,
//! unloadable document, empty map set) abort before anything is written.

use crate::document;
use crate::entry::ConfigMap;
use crate::error::ApiError;
use crate::map_set::{MapLocation, MapSet};
use crate::merge::{merge_map_set, update_map_values, UndefinedKeyPolicy};
use crate::reconcile::{self, ReconcileReport};
use crate::store::{self, OptionStore};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of refreshing one map document.
#[derive(Debug)]
pub struct RefreshOutcome {
    pub map_id: String,
    pub path: PathBuf,
    pub options: usize,
    pub result: Result<(), ApiError>,
}

impl RefreshOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Config map operations over one map set and one option store.
pub struct ConfigMapApi {
    maps: MapSet,
    store: Arc<dyn OptionStore>,
    clock: fn() -> DateTime<Utc>,
}

impl ConfigMapApi {
    pub fn new(maps: MapSet, store: Arc<dyn OptionStore>) -> Self {
        Self {
            maps,
            store,
            clock: Utc::now,
        }
    }

    /// Use a fixed clock for document headers.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn map_set(&self) -> &MapSet {
        &self.maps
    }

    pub fn store(&self) -> &dyn OptionStore {
        self.store.as_ref()
    }

    /// Render a new map document.
    ///
    /// Values come from the `values` map, or from the live store when `None`. The
    /// `template` map fixes which options appear; without one every option of the
    /// value source is included with `action = add`.
    pub fn generate(
        &self,
        template: Option<&str>,
        values: Option<&str>,
    ) -> Result<String, ApiError> {
        let value_source = match values {
            Some(id) => self.load_map(id)?,
            None => store::snapshot(self.store.as_ref())?,
        };

        let (target, policy) = match template {
            Some(id) => (self.load_map(id)?, UndefinedKeyPolicy::Ignore),
            None => (ConfigMap::new(), UndefinedKeyPolicy::Add),
        };

        let generated = update_map_values(target, &value_source, policy);
        info!(
            template = template.unwrap_or("-"),
            values = values.unwrap_or("<store>"),
            options = generated.len(),
            "Generated config map"
        );
        Ok(document::render(&generated, &self.header("generate")))
    }

    /// Configured maps in priority order (lowest first).
    pub fn list(&self) -> &[MapLocation] {
        self.maps.as_slice()
    }

    /// One map with provenance stamped, or the merge of all maps when `None`.
    pub fn show(&self, map_id: Option<&str>) -> Result<ConfigMap, ApiError> {
        match map_id {
            Some(id) => {
                let map = self.load_map(id)?;
                Ok(merge_map_set([(id, &map)]))
            }
            None => self.merged(),
        }
    }

    /// Reconcile the merged map against the store. `commit = false` is a dry run
    /// (and doubles as verification: no records means consistent).
    pub fn reconcile(&self, commit: bool) -> Result<ReconcileReport, ApiError> {
        let merged = self.merged()?;
        reconcile::reconcile(&merged, self.store.as_ref(), commit)
    }

    /// Rewrite map documents with current store values.
    ///
    /// The first map of the set absorbs options that no map defines yet; other maps
    /// keep their option list. Options already owned by a later map are never added
    /// to the first one. Every map involved is loaded and recomputed before the first
    /// file is written.
    pub fn refresh(&self, map_id: Option<&str>) -> Result<Vec<RefreshOutcome>, ApiError> {
        let targets: Vec<&MapLocation> = match map_id {
            Some(id) => vec![self.maps.resolve(id)?],
            None => self.maps.require_maps()?.iter().collect(),
        };

        let loaded = targets
            .iter()
            .map(|location| Ok((*location, document::load(&location.path)?)))
            .collect::<Result<Vec<_>, ApiError>>()?;

        let owned_elsewhere = if loaded.iter().any(|(l, _)| self.maps.is_first(&l.id)) {
            self.names_outside_first(&loaded)?
        } else {
            HashSet::new()
        };

        let snapshot = store::snapshot(self.store.as_ref())?;
        let header = self.header("refresh");

        let outcomes = loaded
            .into_iter()
            .map(|(location, map)| {
                let refreshed = if self.maps.is_first(&location.id) {
                    let values: ConfigMap = snapshot
                        .iter()
                        .filter(|(name, _)| map.contains(name) || !owned_elsewhere.contains(*name))
                        .map(|(name, entry)| (name.clone(), entry.clone()))
                        .collect();
                    update_map_values(map, &values, UndefinedKeyPolicy::Add)
                } else {
                    update_map_values(map, &snapshot, UndefinedKeyPolicy::Ignore)
                };
                let result = document::write(&location.path, &refreshed, &header);
                match &result {
                    Ok(()) => info!(map_id = %location.id, options = refreshed.len(), "Refreshed map"),
                    Err(e) => warn!(map_id = %location.id, error = %e, "Failed to write map"),
                }
                RefreshOutcome {
                    map_id: location.id.clone(),
                    path: location.path.clone(),
                    options: refreshed.len(),
                    result,
                }
            })
            .collect();
        Ok(outcomes)
    }

    /// Top-level option names defined by any map after the first, reusing maps
    /// that are already loaded.
    fn names_outside_first(
        &self,
        loaded: &[(&MapLocation, ConfigMap)],
    ) -> Result<HashSet<String>, ApiError> {
        let mut names = HashSet::new();
        for location in self.maps.iter().skip(1) {
            match loaded.iter().find(|(l, _)| l.id == location.id) {
                Some((_, map)) => names.extend(map.names().map(str::to_string)),
                None => names.extend(document::load(&location.path)?.names().map(str::to_string)),
            }
        }
        Ok(names)
    }

    fn load_map(&self, id: &str) -> Result<ConfigMap, ApiError> {
        let location = self.maps.resolve(id)?;
        document::load(&location.path)
    }

    fn merged(&self) -> Result<ConfigMap, ApiError> {
        let locations = self.maps.require_maps()?;
        let loaded = locations
            .iter()
            .map(|location| Ok((location.id.as_str(), document::load(&location.path)?)))
            .collect::<Result<Vec<_>, ApiError>>()?;
        Ok(merge_map_set(loaded.iter().map(|(id, map)| (*id, map))))
    }

    fn header(&self, operation: &str) -> String {
        document::header_line(operation, (self.clock)())
    }
}
