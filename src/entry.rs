//! Entry Model
//!
//! The recursive data structure behind a config map. Every entry carries an explicit
//! type tag through the [`EntryValue`] variant, so a scalar entry can never hold a
//! nested collection and an array entry can never hold a literal.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// How an entry participates in reconciliation against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyAction {
    /// Documentation-only; never diffed or written.
    Ignore,
    /// Written only when the option is absent from the store.
    Add,
    /// Arrays are merged key-by-key into the stored array; scalars behave like `Replace`.
    Merge,
    /// Stored value is always overwritten.
    Replace,
}

impl ApplyAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplyAction::Ignore => "ignore",
            ApplyAction::Add => "add",
            ApplyAction::Merge => "merge",
            ApplyAction::Replace => "replace",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ignore" => Some(ApplyAction::Ignore),
            "add" => Some(ApplyAction::Add),
            "merge" => Some(ApplyAction::Merge),
            "replace" => Some(ApplyAction::Replace),
            _ => None,
        }
    }
}

impl fmt::Display for ApplyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type tag of an entry, as written in map documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Scalar,
    Array,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Scalar => "scalar",
            EntryKind::Array => "array",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scalar" => Some(EntryKind::Scalar),
            "array" => Some(EntryKind::Array),
            _ => None,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of an entry.
///
/// `Scalar` only ever holds a JSON null, bool, number or string; use
/// [`Entry::from_value`] to build entries from arbitrary store values.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryValue {
    Scalar(Value),
    Array(IndexMap<String, Entry>),
}

/// One configuration item.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub value: EntryValue,
    pub action: ApplyAction,
    /// Id of the map that contributed this entry's value.
    pub source_map: Option<String>,
}

impl Entry {
    /// Scalar entry. Structured values are converted into nested array entries.
    pub fn scalar(value: impl Into<Value>, action: ApplyAction) -> Self {
        Self::from_value(&value.into(), action)
    }

    pub fn array(children: IndexMap<String, Entry>, action: ApplyAction) -> Self {
        Self {
            value: EntryValue::Array(children),
            action,
            source_map: None,
        }
    }

    /// Build an entry tree from a store value. Every nested entry gets `action`.
    ///
    /// JSON lists become arrays keyed by position (`"0"`, `"1"`, ...).
    pub fn from_value(value: &Value, action: ApplyAction) -> Self {
        let value = match value {
            Value::Object(map) => EntryValue::Array(
                map.iter()
                    .map(|(k, v)| (k.clone(), Entry::from_value(v, action)))
                    .collect(),
            ),
            Value::Array(items) => EntryValue::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), Entry::from_value(v, action)))
                    .collect(),
            ),
            scalar => EntryValue::Scalar(scalar.clone()),
        };
        Self {
            value,
            action,
            source_map: None,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self.value {
            EntryValue::Scalar(_) => EntryKind::Scalar,
            EntryValue::Array(_) => EntryKind::Array,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self.value, EntryValue::Array(_))
    }

    pub fn children(&self) -> Option<&IndexMap<String, Entry>> {
        match &self.value {
            EntryValue::Array(children) => Some(children),
            EntryValue::Scalar(_) => None,
        }
    }

    pub fn with_source(mut self, map_id: impl Into<String>) -> Self {
        self.source_map = Some(map_id.into());
        self
    }

    /// Convert to the value persisted in the store.
    ///
    /// Arrays whose keys are exactly `"0".."n-1"` in order become JSON lists, every
    /// other array becomes a JSON object. An empty array becomes an empty list.
    pub fn to_value(&self) -> Value {
        match &self.value {
            EntryValue::Scalar(v) => v.clone(),
            EntryValue::Array(children) => {
                if is_sequential(children) {
                    Value::Array(children.values().map(Entry::to_value).collect())
                } else {
                    let mut map = Map::with_capacity(children.len());
                    for (k, child) in children {
                        map.insert(k.clone(), child.to_value());
                    }
                    Value::Object(map)
                }
            }
        }
    }

    /// Set `source_map` on this entry and every descendant.
    pub fn stamp_source(&mut self, map_id: &str) {
        self.source_map = Some(map_id.to_string());
        if let EntryValue::Array(children) = &mut self.value {
            for child in children.values_mut() {
                child.stamp_source(map_id);
            }
        }
    }

    /// Copy of this entry with `action` on every node and provenance cleared.
    pub(crate) fn restamped(&self, action: ApplyAction) -> Entry {
        let value = match &self.value {
            EntryValue::Scalar(v) => EntryValue::Scalar(v.clone()),
            EntryValue::Array(children) => EntryValue::Array(
                children
                    .iter()
                    .map(|(k, c)| (k.clone(), c.restamped(action)))
                    .collect(),
            ),
        };
        Entry {
            value,
            action,
            source_map: None,
        }
    }
}

fn is_sequential(children: &IndexMap<String, Entry>) -> bool {
    children
        .keys()
        .enumerate()
        .all(|(i, k)| *k == i.to_string())
}

/// Normalize a store value so list-shaped and index-keyed arrays compare equal.
pub fn normalize_value(value: &Value) -> Value {
    Entry::from_value(value, ApplyAction::Add).to_value()
}

/// Ordered mapping from top-level option name to entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigMap {
    entries: IndexMap<String, Entry>,
}

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.entries.get_mut(name)
    }

    /// Insert or replace an entry. Replacing keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, entry: Entry) -> Option<Entry> {
        self.entries.insert(name.into(), entry)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Entry> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> &IndexMap<String, Entry> {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut IndexMap<String, Entry> {
        &mut self.entries
    }

    pub fn stamp_source(&mut self, map_id: &str) {
        for entry in self.entries.values_mut() {
            entry.stamp_source(map_id);
        }
    }
}

impl From<IndexMap<String, Entry>> for ConfigMap {
    fn from(entries: IndexMap<String, Entry>) -> Self {
        Self { entries }
    }
}

impl FromIterator<(String, Entry)> for ConfigMap {
    fn from_iter<T: IntoIterator<Item = (String, Entry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ConfigMap {
    type Item = (String, Entry);
    type IntoIter = indexmap::map::IntoIter<String, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConfigMap {
    type Item = (&'a String, &'a Entry);
    type IntoIter = indexmap::map::Iter<'a, String, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
