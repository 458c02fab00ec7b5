//! Integration tests for Configuration System

use optmap::config::ConfigLoader;
use optmap::map_set::MapLocation;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_config_file_defines_map_set() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("test_config.toml");

    std::fs::write(
        &config_file,
        r#"
[[maps]]
id = "common"
path = "maps/common.yaml"

[[maps]]
id = "prod"
path = "/etc/optmap/prod.yaml"

[store]
path = "/var/lib/optmap"

[logging]
level = "info"
format = "json"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.store.path, PathBuf::from("/var/lib/optmap"));

    let set = config.map_set(temp_dir.path());
    assert_eq!(
        set.as_slice(),
        &[
            MapLocation::new("common", temp_dir.path().join("maps/common.yaml")),
            MapLocation::new("prod", "/etc/optmap/prod.yaml"),
        ]
    );
    assert!(set.is_first("common"));
}

#[test]
fn test_config_without_maps_is_valid() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("test_config.toml");
    std::fs::write(&config_file, "[store]\npath = \"data\"\n").unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert!(config.maps.is_empty());
    assert!(config.map_set(temp_dir.path()).is_empty());
}

#[test]
fn test_map_without_path_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("test_config.toml");
    std::fs::write(&config_file, "[[maps]]\nid = \"common\"\n").unwrap();

    assert!(ConfigLoader::load_from_file(&config_file).is_err());
}

#[test]
fn test_layered_workspace_and_environment() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("optmap.toml"),
        "[[maps]]\nid = \"common\"\npath = \"maps/common.yaml\"\n",
    )
    .unwrap();
    let mut env = config::Map::new();
    env.insert("OPTMAP__LOGGING__LEVEL".to_string(), "trace".to_string());

    let config = ConfigLoader::load_layered(temp_dir.path(), None, None, Some(env)).unwrap();
    assert_eq!(config.maps.len(), 1);
    assert_eq!(config.logging.level, "trace");
}
