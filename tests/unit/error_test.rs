//! Tests for error types

use control_tower::core::TowerError;

#[test]
fn test_invalid_config_error() {
    let err = TowerError::InvalidConfig("gates must be greater than 0".to_string());
    assert_eq!(format!("{err}"), "invalid configuration: gates must be greater than 0");
}

#[test]
fn test_invalid_category_error() {
    let err = TowerError::InvalidCategory("Z".to_string());
    assert_eq!(format!("{err}"), "invalid category: Z");
}

#[test]
fn test_runtime_error() {
    let err = TowerError::Runtime("no reactor running".to_string());
    assert_eq!(format!("{err}"), "runtime error: no reactor running");
}

#[test]
fn test_spawn_error_from_io() {
    let err: TowerError = std::io::Error::other("out of threads").into();
    assert!(matches!(err, TowerError::Spawn(_)));
    assert_eq!(format!("{err}"), "failed to spawn dispatch thread: out of threads");
}
