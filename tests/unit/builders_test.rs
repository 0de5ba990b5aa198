//! Tests for tower builders

use control_tower::builders::{build_tower_from_json, TowerBuilder};
use control_tower::config::TowerConfig;
use control_tower::core::TowerError;
use control_tower::runtime::TokioSpawner;

#[tokio::test]
async fn test_build_from_json() {
    let tower = build_tower_from_json(
        r#"{ "runways": 2, "gates": 1, "max_active": 4 }"#,
        TokioSpawner::current().unwrap(),
    )
    .unwrap();
    assert_eq!(tower.config().runways, 2);
    assert_eq!(tower.runway_stats().capacity, 2);
    assert_eq!(tower.gate_stats().capacity, 1);
    assert_eq!(tower.pending(), 0);
    tower.shutdown();
}

#[tokio::test]
async fn test_build_from_invalid_json() {
    let result = build_tower_from_json(r#"{ "max_active": 0 }"#, TokioSpawner::current().unwrap());
    assert!(matches!(result, Err(TowerError::InvalidConfig(_))));
}

#[test]
fn test_spawner_requires_runtime() {
    assert!(matches!(TokioSpawner::current(), Err(TowerError::Runtime(_))));
}

#[tokio::test]
async fn test_builder_defaults_to_tracing_sink() {
    let tower = TowerBuilder::new(TowerConfig::default())
        .build(TokioSpawner::current().unwrap())
        .unwrap();
    assert!(tower.snapshot().active.is_empty());
}
