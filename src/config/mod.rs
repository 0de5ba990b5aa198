//! Configuration models for the tower and simulation runs.

pub mod tower;

pub use tower::{SimulationConfig, TowerConfig};
