//! Option Store
//!
//! The live key-value settings table that config maps are reconciled against.
//! The engine only needs three operations from it: list the option names, read one
//! option, and write one option.

pub mod memory;
pub mod persistence;

pub use memory::MemoryOptionStore;
pub use persistence::SledOptionStore;

use crate::entry::{ApplyAction, ConfigMap, Entry};
use crate::error::StorageError;
use serde_json::Value;

/// Option Store interface
pub trait OptionStore {
    /// Names of every option currently stored.
    fn list_keys(&self) -> Result<Vec<String>, StorageError>;

    fn get(&self, name: &str) -> Result<Option<Value>, StorageError>;

    fn set(&self, name: &str, value: &Value) -> Result<(), StorageError>;
}

/// Read the whole store as a config map.
///
/// Every entry gets `action = add` and no provenance, which is what a freshly
/// generated map looks like.
pub fn snapshot(store: &dyn OptionStore) -> Result<ConfigMap, StorageError> {
    let mut map = ConfigMap::new();
    for name in store.list_keys()? {
        if let Some(value) = store.get(&name)? {
            map.insert(name, Entry::from_value(&value, ApplyAction::Add));
        }
    }
    Ok(map)
}
