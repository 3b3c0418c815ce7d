use super::*;
use crate::error::Error;

#[test]
fn test_default_paths() {
    let config = ContentConfig::default();
    assert_eq!(config.asset_root, PathBuf::from("assets"));
    assert_eq!(config.registry_file, PathBuf::from("assets/asset_registry.ron"));
}

#[test]
fn test_with_asset_root_places_registry_inside() {
    let config = ContentConfig::with_asset_root("/data/game");
    assert_eq!(config.registry_file, Path::new("/data/game").join("asset_registry.ron"));
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("content.ron");
    let mut config = ContentConfig::with_asset_root(dir.path().join("assets"));
    config.registry_file = dir.path().join("registry.ron");

    config.save(&path).unwrap();
    assert_eq!(ContentConfig::load(&path).unwrap(), config);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(ContentConfig::load(&dir.path().join("nope.ron")), Err(Error::Io(_))));
}

#[test]
fn test_load_garbage_is_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.ron");
    std::fs::write(&path, "(asset_root: 12").unwrap();
    assert!(matches!(ContentConfig::load(&path), Err(Error::Serialization(_))));
}
