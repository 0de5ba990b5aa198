//! Tests for configuration validation

use std::collections::HashMap;
use std::time::Duration;

use control_tower::config::{SimulationConfig, TowerConfig};
use control_tower::core::{Category, TowerError};

#[test]
fn test_defaults_are_valid() {
    let config = TowerConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.runways, 3);
    assert_eq!(config.gates, 2);
    assert_eq!(config.max_active, 10);
    assert_eq!(config.variation_percent, 15);
}

#[test]
fn test_zero_capacities_rejected() {
    assert!(TowerConfig::new().with_runways(0).validate().is_err());
    assert!(TowerConfig::new().with_gates(0).validate().is_err());
    assert!(TowerConfig::new().with_max_active(0).validate().is_err());
}

#[test]
fn test_excessive_variation_rejected() {
    let result = TowerConfig::new().with_variation_percent(101).validate();
    assert!(matches!(result, Err(TowerError::InvalidConfig(_))));
    assert!(TowerConfig::new().with_variation_percent(100).validate().is_ok());
}

#[test]
fn test_gate_base_by_category() {
    let config = TowerConfig::default();
    assert_eq!(config.gate_base_for(Category::A), 5000);
    assert_eq!(config.gate_base_for(Category::B), 4000);
    assert_eq!(config.gate_base_for(Category::C), 3000);
}

#[test]
fn test_hold_within_bounds() {
    let config = TowerConfig::new().with_runway_base_ms(100).with_variation_percent(20);
    let (min, max) = config.runway_hold_bounds();
    assert_eq!(min, Duration::from_millis(80));
    assert_eq!(max, Duration::from_millis(120));
    for _ in 0..100 {
        let hold = config.runway_hold();
        assert!(hold >= min && hold <= max);
        let gate = config.gate_hold(Category::A);
        let (gmin, gmax) = config.gate_hold_bounds(Category::A);
        assert!(gate >= gmin && gate <= gmax);
    }
}

#[test]
fn test_tower_config_from_json() {
    let json = r#"{ "runways": 1, "gates": 4, "max_active": 5 }"#;
    let config = TowerConfig::from_json_str(json).unwrap();
    assert_eq!(config.runways, 1);
    assert_eq!(config.gates, 4);
    assert_eq!(config.max_active, 5);
    // Unspecified fields fall back to defaults.
    assert_eq!(config.runway_base_ms, 2500);
}

#[test]
fn test_tower_config_from_json_invalid() {
    assert!(TowerConfig::from_json_str(r#"{ "gates": 0 }"#).is_err());
    assert!(TowerConfig::from_json_str("not json").is_err());
}

#[test]
fn test_simulation_config_from_json() {
    let json = r#"{ "runways": 2, "population": 30, "seed": 5 }"#;
    let config = SimulationConfig::from_json_str(json).unwrap();
    assert_eq!(config.tower.runways, 2);
    assert_eq!(config.population, 30);
    assert_eq!(config.seed, Some(5));
}

#[test]
fn test_simulation_config_from_lookup() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("CONTROL_TOWER_RUNWAYS", "4"),
        ("CONTROL_TOWER_MAX_ACTIVE", " 6 "),
        ("CONTROL_TOWER_POPULATION", "50"),
        ("CONTROL_TOWER_SEED", "17"),
    ]);
    let config = SimulationConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string())).unwrap();
    assert_eq!(config.tower.runways, 4);
    assert_eq!(config.tower.max_active, 6);
    assert_eq!(config.tower.gates, 2);
    assert_eq!(config.population, 50);
    assert_eq!(config.seed, Some(17));
}

#[test]
fn test_simulation_config_from_lookup_rejects_garbage() {
    let result = SimulationConfig::from_lookup(|key| {
        (key == "CONTROL_TOWER_GATES").then(|| "two".to_string())
    });
    assert!(matches!(result, Err(TowerError::InvalidConfig(msg)) if msg.contains("CONTROL_TOWER_GATES")));
}

#[test]
fn test_overflowing_runway_duration_rejected() {
    let result = TowerConfig::from_json_str(r#"{ "runway_base_ms": 18446744073709551615 }"#);
    assert!(matches!(result, Err(TowerError::InvalidConfig(msg)) if msg.contains("runway_base_ms")));
}

#[test]
fn test_overflowing_gate_duration_rejected() {
    let sum_overflows = TowerConfig::new().with_gate_base_ms(u64::MAX).with_gate_extras_ms(1, 0);
    assert!(matches!(sum_overflows.validate(), Err(TowerError::InvalidConfig(_))));

    // The sum fits, but the varied upper bound does not.
    let bound_overflows = TowerConfig::new()
        .with_gate_base_ms(u64::MAX - 10)
        .with_gate_extras_ms(0, 5)
        .with_variation_percent(1);
    assert!(matches!(bound_overflows.validate(), Err(TowerError::InvalidConfig(_))));
}

#[test]
fn test_largest_exact_duration_accepted() {
    let config = TowerConfig::new()
        .with_runway_base_ms(u64::MAX)
        .with_gate_base_ms(u64::MAX)
        .with_gate_extras_ms(0, 0)
        .with_variation_percent(0);
    assert!(config.validate().is_ok());
    assert_eq!(config.gate_base_for(Category::A), u64::MAX);
    assert_eq!(config.runway_hold_bounds().1, Duration::from_millis(u64::MAX));
}
