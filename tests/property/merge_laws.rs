//! Property-based tests for map-set merge and reconcile

use crate::property::strategies::{config_map, store_value};
use optmap::entry::ApplyAction;
use optmap::merge::{merge_map_set, overlay};
use optmap::reconcile::reconcile;
use optmap::store::MemoryOptionStore;
use proptest::prelude::*;

proptest! {
    #[test]
    fn merge_is_a_left_fold(a in config_map(), b in config_map(), c in config_map()) {
        let all = merge_map_set([("a", &a), ("b", &b), ("c", &c)]);
        let stepwise = overlay(merge_map_set([("a", &a), ("b", &b)]), "c", &c);
        prop_assert_eq!(all, stepwise);
    }

    #[test]
    fn merge_priority(a in config_map(), b in config_map(), c in config_map()) {
        let merged = merge_map_set([("a", &a), ("b", &b), ("c", &c)]);

        for (name, entry) in &a {
            if !b.contains(name) && !c.contains(name) {
                let got = merged.get(name).unwrap();
                prop_assert_eq!(got.to_value(), entry.to_value());
                prop_assert_eq!(got.source_map.as_deref(), Some("a"));
            }
        }
        for (name, entry) in &c {
            let got = merged.get(name).unwrap();
            prop_assert_eq!(got.source_map.as_deref(), Some("c"));
            prop_assert_eq!(got.action, entry.action);
            if !entry.is_array() {
                prop_assert_eq!(got.to_value(), entry.to_value());
            }
        }
        for name in merged.names() {
            prop_assert!(a.contains(name) || b.contains(name) || c.contains(name));
        }
    }

    #[test]
    fn reconcile_commit_is_idempotent(
        map in config_map(),
        existing in prop::collection::vec(("[a-z_]{1,8}", store_value()), 0..6),
    ) {
        let store = MemoryOptionStore::with_options(existing);
        let merged = merge_map_set([("common", &map)]);

        let first = reconcile(&merged, &store, true).unwrap();
        prop_assert_eq!(first.failures().count(), 0);
        let all_non_ignored = first.records.iter().all(|r| {
            merged.get(&r.option).map(|e| e.action != ApplyAction::Ignore).unwrap_or(false)
        });
        prop_assert!(all_non_ignored);

        let second = reconcile(&merged, &store, false).unwrap();
        prop_assert!(second.is_consistent(), "{:?}", second.records);
    }
}
