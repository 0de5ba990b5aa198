//! Runtime adapters and the end-to-end simulation driver.

pub mod simulation;
pub mod tokio_spawner;

pub use simulation::{run_simulation, Arrival, Population, SimulationReport};
pub use tokio_spawner::TokioSpawner;
