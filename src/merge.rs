//! Merger: structural override merge of config maps.
//!
//! Map-set merge folds an ordered list of maps (later wins) into one effective map,
//! recursing into arrays defined as arrays on both sides. Target/value merge refreshes
//! the values of a target map from a value source (usually the live store) while
//! keeping the target's shape and apply actions.

use crate::entry::{ApplyAction, ConfigMap, Entry, EntryValue};
use indexmap::IndexMap;
use tracing::{debug, trace};

/// What to do with options present in the value source but absent from the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndefinedKeyPolicy {
    /// Insert them with `action = add`.
    Add,
    /// Drop them.
    Ignore,
}

/// Merge an ordered map set into one map. Earlier maps have lower priority.
///
/// Every surviving entry has `source_map` set to the id of the map that contributed
/// its final value.
pub fn merge_map_set<'a, I>(maps: I) -> ConfigMap
where
    I: IntoIterator<Item = (&'a str, &'a ConfigMap)>,
{
    maps.into_iter()
        .fold(ConfigMap::new(), |merged, (id, map)| overlay(merged, id, map))
}

/// Overlay `map` (identified by `map_id`) on top of `base`.
pub fn overlay(mut base: ConfigMap, map_id: &str, map: &ConfigMap) -> ConfigMap {
    let mut top = map.clone();
    top.stamp_source(map_id);
    debug!(map_id, options = top.len(), "Overlaying config map");
    overlay_entries(base.entries_mut(), top);
    base
}

fn overlay_entries(base: &mut IndexMap<String, Entry>, top: impl IntoIterator<Item = (String, Entry)>) {
    for (name, entry) in top {
        match base.get_mut(&name) {
            Some(existing) => overlay_entry(existing, entry),
            None => {
                base.insert(name, entry);
            }
        }
    }
}

/// Higher-priority `top` wins; arrays on both sides merge child by child.
pub(crate) fn overlay_entry(base: &mut Entry, top: Entry) {
    if !(base.is_array() && top.is_array()) {
        *base = top;
        return;
    }
    if let (EntryValue::Array(children), EntryValue::Array(top_children)) =
        (&mut base.value, top.value)
    {
        overlay_entries(children, top_children);
    }
    base.action = top.action;
    base.source_map = top.source_map;
}

/// Refresh the values of `target` from `source`.
///
/// Entries with `action = ignore` keep their value. Target entries missing from the
/// source are left unchanged. Source entries missing from the target follow
/// `undefined`, at every nesting level.
pub fn update_map_values(
    mut target: ConfigMap,
    source: &ConfigMap,
    undefined: UndefinedKeyPolicy,
) -> ConfigMap {
    update_entries(target.entries_mut(), source.entries(), undefined);
    target
}

fn update_entries(
    target: &mut IndexMap<String, Entry>,
    source: &IndexMap<String, Entry>,
    undefined: UndefinedKeyPolicy,
) {
    for (name, entry) in target.iter_mut() {
        if entry.action == ApplyAction::Ignore {
            continue;
        }
        if let Some(found) = source.get(name) {
            update_entry(entry, found, undefined);
        }
    }

    if undefined == UndefinedKeyPolicy::Add {
        for (name, found) in source {
            if !target.contains_key(name) {
                trace!(option = %name, "Adding undefined option");
                target.insert(name.clone(), found.restamped(ApplyAction::Add));
            }
        }
    }
}

fn update_entry(entry: &mut Entry, found: &Entry, undefined: UndefinedKeyPolicy) {
    if let (EntryValue::Array(children), EntryValue::Array(found_children)) =
        (&mut entry.value, &found.value)
    {
        update_entries(children, found_children, undefined);
        return;
    }
    // Shape changed or scalar: the source value wins and the tag follows it.
    entry.value = match &found.value {
        EntryValue::Scalar(v) => EntryValue::Scalar(v.clone()),
        EntryValue::Array(_) => found.restamped(ApplyAction::Add).value,
    };
}
