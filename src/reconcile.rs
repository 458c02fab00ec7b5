//! Differ/Applier: reconcile a merged config map against the live option store.
//!
//! Each non-ignored top-level entry is compared with the stored option as one unit
//! (arrays are persisted as single values). The resulting change records are returned
//! in map order and, when committing, written one `set` at a time. A failed write is
//! folded into its record and the remaining records are still attempted.

use crate::entry::{normalize_value, ApplyAction, ConfigMap, Entry};
use crate::error::{ApiError, StorageError};
use crate::merge::overlay_entry;
use crate::store::OptionStore;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Create,
    Update,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Create => "create",
            ChangeKind::Update => "update",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum ChangeStatus {
    /// Computed but not written (dry run).
    Pending,
    Applied,
    Failed(String),
}

/// One pending or applied change to a stored option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRecord {
    pub option: String,
    pub kind: ChangeKind,
    /// Stored value before the change; `None` when the option was absent.
    pub old: Option<Value>,
    pub new: Value,
    pub action: ApplyAction,
    pub source_map: Option<String>,
    pub status: ChangeStatus,
}

/// Result of one reconcile pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileReport {
    pub records: Vec<ChangeRecord>,
    pub committed: bool,
}

impl ReconcileReport {
    /// True when the store already matches the map.
    pub fn is_consistent(&self) -> bool {
        self.records.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r.status, ChangeStatus::Failed(_)))
    }

    pub fn applied_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status == ChangeStatus::Applied)
            .count()
    }
}

/// Compute the changes needed to bring `store` in line with `map`.
pub fn diff(map: &ConfigMap, store: &dyn OptionStore) -> Result<Vec<ChangeRecord>, StorageError> {
    let mut records = Vec::new();
    for (name, entry) in map {
        if entry.action == ApplyAction::Ignore {
            continue;
        }
        let current = store.get(name)?;
        let Some(target) = target_value(entry, current.as_ref()) else {
            continue;
        };

        let kind = match &current {
            None => ChangeKind::Create,
            Some(existing) if normalize_value(existing) != normalize_value(&target) => {
                ChangeKind::Update
            }
            Some(_) => continue,
        };
        debug!(option = %name, kind = kind.as_str(), action = %entry.action, "Pending change");
        records.push(ChangeRecord {
            option: name.clone(),
            kind,
            old: current,
            new: target,
            action: entry.action,
            source_map: entry.source_map.clone(),
            status: ChangeStatus::Pending,
        });
    }
    Ok(records)
}

/// Diff `map` against `store` and, when `commit` is set, write every change.
pub fn reconcile(
    map: &ConfigMap,
    store: &dyn OptionStore,
    commit: bool,
) -> Result<ReconcileReport, ApiError> {
    let mut records = diff(map, store)?;

    if commit {
        for record in &mut records {
            record.status = match store.set(&record.option, &record.new) {
                Ok(()) => ChangeStatus::Applied,
                Err(e) => {
                    let err = ApiError::StoreWriteError {
                        key: record.option.clone(),
                        reason: e.to_string(),
                    };
                    warn!(option = %record.option, error = %e, "Store write failed");
                    ChangeStatus::Failed(err.to_string())
                }
            };
        }
    }

    let report = ReconcileReport { records, committed: commit };
    info!(
        changes = report.records.len(),
        applied = report.applied_count(),
        failed = report.failures().count(),
        committed = commit,
        "Reconcile finished"
    );
    Ok(report)
}

/// Value the store should hold for `entry`, or `None` when the entry never writes.
fn target_value(entry: &Entry, current: Option<&Value>) -> Option<Value> {
    match (entry.action, current) {
        (ApplyAction::Ignore, _) => None,
        (ApplyAction::Add, Some(_)) => None,
        (ApplyAction::Merge, Some(existing)) if entry.is_array() => {
            let mut merged = Entry::from_value(existing, ApplyAction::Add);
            overlay_entry(&mut merged, entry.clone());
            Some(merged.to_value())
        }
        _ => Some(entry.to_value()),
    }
}
