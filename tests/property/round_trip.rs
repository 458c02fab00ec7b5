//! Property-based tests for the document round trip

use crate::property::strategies::{config_map, store_value};
use optmap::document::{parse, render};
use optmap::entry::{normalize_value, ApplyAction, Entry};
use std::path::Path;

/// Rendering then loading reproduces the map, provenance and actions included
#[test]
fn test_render_load_round_trip_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&config_map(), |map| {
            let text = render(&map, "round trip");
            let loaded = parse(&text, Path::new("round-trip.yaml"))
                .unwrap_or_else(|e| panic!("{}\n---\n{}", e, text));
            assert_eq!(loaded, map, "document was:\n{}", text);
            Ok(())
        })
        .unwrap();
}

/// Rendering is deterministic
#[test]
fn test_render_determinism_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&config_map(), |map| {
            assert_eq!(render(&map, "h"), render(&map.clone(), "h"));
            Ok(())
        })
        .unwrap();
}

/// Store values survive conversion to entries and back, up to list/index-key shape
#[test]
fn test_store_value_conversion_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&store_value(), |value| {
            let entry = Entry::from_value(&value, ApplyAction::Add);
            assert_eq!(normalize_value(&entry.to_value()), normalize_value(&value));
            assert_eq!(normalize_value(&normalize_value(&value)), normalize_value(&value));
            Ok(())
        })
        .unwrap();
}
