//! Integration tests for the sled-backed Option Store

use optmap::api::ConfigMapApi;
use optmap::entry::{ApplyAction, ConfigMap, Entry};
use optmap::map_set::{MapLocation, MapSet};
use optmap::document;
use optmap::store::{snapshot, OptionStore, SledOptionStore};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_values_keep_their_json_shape() {
    let store_dir = TempDir::new().unwrap();
    let store = SledOptionStore::new(store_dir.path()).unwrap();

    store.set("site_name", &json!("Acme")).unwrap();
    store.set("posts_per_page", &json!(10)).unwrap();
    store.set("menu", &json!(["home", "about"])).unwrap();
    store.set("feature_flags", &json!({"beta": true})).unwrap();
    store.flush().unwrap();

    assert_eq!(store.get("posts_per_page").unwrap(), Some(json!(10)));
    assert_eq!(store.get("menu").unwrap(), Some(json!(["home", "about"])));
    assert_eq!(store.get("missing").unwrap(), None);

    let mut keys = store.list_keys().unwrap();
    keys.sort();
    assert_eq!(keys, vec!["feature_flags", "menu", "posts_per_page", "site_name"]);

    let map = snapshot(&store).unwrap();
    assert_eq!(map.len(), 4);
    assert!(map.get("menu").unwrap().is_array());
}

#[test]
fn test_apply_against_sled_store() {
    let temp_dir = TempDir::new().unwrap();
    let map_path = temp_dir.path().join("common.yaml");
    let mut map = ConfigMap::new();
    map.insert("site_name", Entry::scalar("Acme", ApplyAction::Replace));
    map.insert("menu", Entry::from_value(&json!(["home"]), ApplyAction::Replace));
    document::write(&map_path, &map, "fixture").unwrap();

    let store = Arc::new(SledOptionStore::new(temp_dir.path().join("store")).unwrap());
    let api = ConfigMapApi::new(
        MapSet::new(vec![MapLocation::new("common", &map_path)]),
        store.clone(),
    );

    let report = api.reconcile(true).unwrap();
    assert_eq!(report.applied_count(), 2);
    store.flush().unwrap();

    assert_eq!(store.get("menu").unwrap(), Some(json!(["home"])));
    assert!(api.reconcile(false).unwrap().is_consistent());
}
