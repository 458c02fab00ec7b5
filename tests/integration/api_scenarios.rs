//! End-to-end scenarios through the config map API

use crate::integration::test_utils::MapWorkspace;
use optmap::document;
use optmap::entry::{ApplyAction, ConfigMap, Entry, EntryKind};
use optmap::error::ApiError;
use optmap::reconcile::{ChangeKind, ChangeStatus};
use optmap::store::{MemoryOptionStore, OptionStore};
use serde_json::json;
use std::sync::Arc;

fn map_of(pairs: Vec<(&str, Entry)>) -> ConfigMap {
    pairs.into_iter().map(|(k, e)| (k.to_string(), e)).collect()
}

#[test]
fn test_generate_from_store() {
    let ws = MapWorkspace::new();
    let store = Arc::new(MemoryOptionStore::with_options([
        ("site_name", json!("Acme")),
        ("feature_flags", json!({"beta": true})),
    ]));
    let api = ws.api(store);

    let text = api.generate(None, None).unwrap();
    let map = document::parse(&text, ws.dir.path()).unwrap();

    assert_eq!(map.len(), 2);
    let site = map.get("site_name").unwrap();
    assert_eq!(site.kind(), EntryKind::Scalar);
    assert_eq!(site.to_value(), json!("Acme"));
    assert_eq!(site.action, ApplyAction::Add);
    assert_eq!(site.source_map, None);

    let flags = map.get("feature_flags").unwrap();
    assert_eq!(flags.kind(), EntryKind::Array);
    assert_eq!(flags.to_value(), json!({"beta": true}));
    assert_eq!(flags.action, ApplyAction::Add);
}

#[test]
fn test_generate_values_from_another_map() {
    let mut ws = MapWorkspace::new();
    ws.add_map(
        "common",
        &map_of(vec![
            ("site_name", Entry::scalar("Template", ApplyAction::Replace)),
            ("admin_email", Entry::scalar("ops@example.com", ApplyAction::Add)),
        ]),
    );
    ws.add_map(
        "prod",
        &map_of(vec![("site_name", Entry::scalar("Acme Prod", ApplyAction::Replace))]),
    );
    let api = ws.api(Arc::new(MemoryOptionStore::new()));

    let text = api.generate(Some("common"), Some("prod")).unwrap();
    let map = document::parse(&text, ws.dir.path()).unwrap();
    assert_eq!(map.get("site_name").unwrap().to_value(), json!("Acme Prod"));
    assert_eq!(
        map.get("admin_email").unwrap().to_value(),
        json!("ops@example.com")
    );
}

#[test]
fn test_dry_run_then_commit() {
    let mut ws = MapWorkspace::new();
    ws.add_map(
        "common",
        &map_of(vec![("site_name", Entry::scalar("NewName", ApplyAction::Replace))]),
    );
    let store = Arc::new(MemoryOptionStore::with_options([("site_name", json!("Acme"))]));
    let api = ws.api(store.clone());

    let dry = api.reconcile(false).unwrap();
    assert!(!dry.committed);
    assert_eq!(dry.records.len(), 1);
    let record = &dry.records[0];
    assert_eq!(record.option, "site_name");
    assert_eq!(record.kind, ChangeKind::Update);
    assert_eq!(record.old, Some(json!("Acme")));
    assert_eq!(record.new, json!("NewName"));
    assert_eq!(record.source_map.as_deref(), Some("common"));
    assert_eq!(record.status, ChangeStatus::Pending);
    assert_eq!(store.get("site_name").unwrap(), Some(json!("Acme")));

    let committed = api.reconcile(true).unwrap();
    assert_eq!(committed.records.len(), 1);
    assert_eq!(committed.records[0].status, ChangeStatus::Applied);
    assert_eq!(store.get("site_name").unwrap(), Some(json!("NewName")));
}

#[test]
fn test_commit_is_idempotent() {
    let mut ws = MapWorkspace::new();
    ws.add_map(
        "common",
        &map_of(vec![
            ("site_name", Entry::scalar("Acme", ApplyAction::Replace)),
            ("admin_email", Entry::scalar("ops@example.com", ApplyAction::Add)),
            ("menu", Entry::from_value(&json!(["home", "about"]), ApplyAction::Replace)),
            ("notes", Entry::scalar("docs only", ApplyAction::Ignore)),
        ]),
    );
    ws.add_map(
        "prod",
        &map_of(vec![(
            "feature_flags",
            Entry::from_value(&json!({"beta": false}), ApplyAction::Merge),
        )]),
    );
    let store = Arc::new(MemoryOptionStore::with_options([
        ("admin_email", json!("keep@example.com")),
        ("feature_flags", json!({"beta": true, "legacy": true})),
    ]));
    let api = ws.api(store.clone());

    let report = api.reconcile(true).unwrap();
    assert_eq!(report.failures().count(), 0);
    assert!(report.records.iter().all(|r| r.option != "notes"));

    let again = api.reconcile(false).unwrap();
    assert!(again.is_consistent(), "{:?}", again.records);

    let contents = store.contents();
    assert_eq!(contents["admin_email"], json!("keep@example.com"));
    assert_eq!(contents["menu"], json!(["home", "about"]));
    assert_eq!(
        contents["feature_flags"],
        json!({"beta": false, "legacy": true})
    );
    assert!(!contents.contains_key("notes"));
}

#[test]
fn test_later_map_wins_in_show() {
    let mut ws = MapWorkspace::new();
    ws.add_map(
        "common",
        &map_of(vec![
            ("site_name", Entry::scalar("Acme", ApplyAction::Replace)),
            ("opts", Entry::from_value(&json!({"x": 1, "y": 2}), ApplyAction::Merge)),
        ]),
    );
    ws.add_map(
        "prod",
        &map_of(vec![("opts", Entry::from_value(&json!({"y": 9}), ApplyAction::Merge))]),
    );
    let api = ws.api(Arc::new(MemoryOptionStore::new()));

    let merged = api.show(None).unwrap();
    assert_eq!(merged.get("site_name").unwrap().source_map.as_deref(), Some("common"));
    let opts = merged.get("opts").unwrap();
    assert_eq!(opts.to_value(), json!({"x": 1, "y": 9}));
    let children = opts.children().unwrap();
    assert_eq!(children["x"].source_map.as_deref(), Some("common"));
    assert_eq!(children["y"].source_map.as_deref(), Some("prod"));

    let single = api.show(Some("prod")).unwrap();
    assert_eq!(single.len(), 1);
    assert_eq!(single.get("opts").unwrap().source_map.as_deref(), Some("prod"));
}

#[test]
fn test_undefined_key_refresh() {
    let mut ws = MapWorkspace::new();
    let common_path = ws.add_map(
        "common",
        &map_of(vec![("site_name", Entry::scalar("Old", ApplyAction::Replace))]),
    );
    let prod_path = ws.add_map(
        "prod",
        &map_of(vec![("site_name", Entry::scalar("Old", ApplyAction::Replace))]),
    );
    let store = Arc::new(MemoryOptionStore::with_options([
        ("site_name", json!("Acme")),
        ("new_option", json!(7)),
    ]));
    let api = ws.api(store);

    let outcomes = api.refresh(Some("prod")).unwrap();
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_ok());
    let prod = document::load(&prod_path).unwrap();
    assert!(!prod.contains("new_option"));
    assert_eq!(prod.get("site_name").unwrap().to_value(), json!("Acme"));
    assert_eq!(prod.get("site_name").unwrap().action, ApplyAction::Replace);

    let outcomes = api.refresh(Some("common")).unwrap();
    assert_eq!(outcomes[0].options, 2);
    let common = document::load(&common_path).unwrap();
    let added = common.get("new_option").unwrap();
    assert_eq!(added.to_value(), json!(7));
    assert_eq!(added.action, ApplyAction::Add);
    assert_eq!(added.source_map, None);
}

#[test]
fn test_refresh_first_map_skips_options_owned_elsewhere() {
    let mut ws = MapWorkspace::new();
    let common_path = ws.add_map(
        "common",
        &map_of(vec![("site_name", Entry::scalar("Old", ApplyAction::Replace))]),
    );
    let prod_path = ws.add_map(
        "prod",
        &map_of(vec![("prod_only", Entry::scalar("old", ApplyAction::Replace))]),
    );
    let store = Arc::new(MemoryOptionStore::with_options([
        ("site_name", json!("Acme")),
        ("prod_only", json!("live")),
        ("brand_new", json!(true)),
    ]));
    let api = ws.api(store);

    let outcomes = api.refresh(Some("common")).unwrap();
    assert!(outcomes[0].is_ok());
    assert_eq!(outcomes[0].options, 2);
    let common = document::load(&common_path).unwrap();
    assert_eq!(common.names().collect::<Vec<_>>(), vec!["site_name", "brand_new"]);
    assert_eq!(common.get("site_name").unwrap().to_value(), json!("Acme"));
    assert!(!common.contains("prod_only"));

    api.refresh(None).unwrap();
    let common = document::load(&common_path).unwrap();
    assert!(!common.contains("prod_only"));
    let prod = document::load(&prod_path).unwrap();
    assert_eq!(prod.get("prod_only").unwrap().to_value(), json!("live"));
    assert!(!prod.contains("brand_new"));
}

#[test]
fn test_refresh_all_maps() {
    let mut ws = MapWorkspace::new();
    ws.add_map("common", &ConfigMap::new());
    let prod_path = ws.add_map(
        "prod",
        &map_of(vec![("frozen", Entry::scalar("keep", ApplyAction::Ignore))]),
    );
    let store = Arc::new(MemoryOptionStore::with_options([("frozen", json!("changed"))]));
    let api = ws.api(store);

    let outcomes = api.refresh(None).unwrap();
    let ids: Vec<&str> = outcomes.iter().map(|o| o.map_id.as_str()).collect();
    assert_eq!(ids, vec!["common", "prod"]);
    assert!(outcomes.iter().all(|o| o.is_ok()));

    let prod = document::load(&prod_path).unwrap();
    assert_eq!(prod.get("frozen").unwrap().to_value(), json!("keep"));
}

#[test]
fn test_request_errors() {
    let mut ws = MapWorkspace::new();
    let empty = ws.api(Arc::new(MemoryOptionStore::new()));
    assert!(matches!(empty.reconcile(true), Err(ApiError::EmptyMapSet)));

    ws.add_raw_map("broken", "\"site_name\":\n  type: scalar\n  value: \"x\"\n");
    let api = ws.api(Arc::new(MemoryOptionStore::new()));
    match api.show(Some("broken")) {
        Err(ApiError::LoadError { reason, .. }) => assert!(reason.contains("action"), "{}", reason),
        other => panic!("unexpected: {other:?}"),
    }
    assert!(matches!(
        api.refresh(Some("staging")),
        Err(ApiError::UnknownMapId(id)) if id == "staging"
    ));
}
