//! Builders to construct towers from configuration.

pub mod tower_builder;

pub use tower_builder::{build_tower_from_json, TowerBuilder};
