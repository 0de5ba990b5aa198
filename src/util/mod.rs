//! Shared utilities.

pub mod clock;
pub mod jitter;
pub mod telemetry;

pub use clock::*;
pub use jitter::*;
pub use telemetry::*;
