//! In-memory option store, insertion-ordered.

use crate::error::StorageError;
use crate::store::OptionStore;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;

#[derive(Debug, Default)]
pub struct MemoryOptionStore {
    options: RwLock<IndexMap<String, Value>>,
}

impl MemoryOptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options<I, K>(options: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            options: RwLock::new(options.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }

    /// Copy of the current contents.
    pub fn contents(&self) -> IndexMap<String, Value> {
        self.options.read().clone()
    }
}

impl OptionStore for MemoryOptionStore {
    fn list_keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.options.read().keys().cloned().collect())
    }

    fn get(&self, name: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.options.read().get(name).cloned())
    }

    fn set(&self, name: &str, value: &Value) -> Result<(), StorageError> {
        self.options.write().insert(name.to_string(), value.clone());
        Ok(())
    }
}
