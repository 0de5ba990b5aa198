//! Error types for tower operations.

use thiserror::Error;

/// Errors produced by tower components.
#[derive(Debug, Error)]
pub enum TowerError {
    /// Configuration would deadlock or is otherwise degenerate.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Category text outside `A`, `B`, `C`.
    #[error("invalid category: {0}")]
    InvalidCategory(String),
    /// Async runtime missing or a blocking task failed to join.
    #[error("runtime error: {0}")]
    Runtime(String),
    /// The dispatch thread could not be started.
    #[error("failed to spawn dispatch thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
