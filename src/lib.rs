//! # Control Tower
//!
//! A priority-aware scheduler that hands a fixed number of runway and gate
//! slots to a stream of arriving aircraft.
//!
//! Arrivals are admitted into a bounded *active* set when it has room and
//! into an unbounded *overflow* set otherwise. A dedicated dispatch thread
//! takes a runway slot, promotes overflow aircraft while the active set has
//! room, and clears the highest-priority aircraft (category A, then B, then
//! C, first come first served within a category) for landing. Each landing
//! runs as an async task: it holds the runway for a jittered duration, then
//! waits for a gate, holds it for a category-dependent duration, and records
//! elapsed times.
//!
//! ## Key Pieces
//!
//! - **`ControlTower`**: primary lock, admission, and the dispatch loop
//! - **`HoldingQueue`**: heap keyed by category and insertion order
//! - **`SlotPool`** / **`AsyncSlotPool`**: counting pools with RAII permits (blocking for runways, async for gates)
//! - **`CompletionLatch`**: wait-group for run completion
//! - **`EventSink`**: line-atomic event log (tracing or in-memory)
//!
//! ```rust,ignore
//! use control_tower::builders::TowerBuilder;
//! use control_tower::config::TowerConfig;
//! use control_tower::core::Aircraft;
//! use control_tower::runtime::TokioSpawner;
//!
//! let tower = TowerBuilder::new(TowerConfig::new().with_runways(2))
//!     .build(TokioSpawner::current()?)?;
//! tower.admit(Aircraft::connect(1, 120));
//! tower.wait_until_idle_async().await?;
//! println!("mean landing time: {:.2}s", tower.metrics().connect_to_landed.mean());
//! ```
//!
//! For complete scenarios, see `tests/tower_scenarios_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Scheduling core: aircraft, queues, slot pools, and the dispatch loop.
pub mod core;
/// Configuration models for the tower and simulation runs.
pub mod config;
/// Builders to construct towers from configuration.
pub mod builders;
/// Runtime adapters and the simulation driver.
pub mod runtime;
/// Shared utilities.
pub mod util;
