//! Tokio runtime spawner implementation.

use std::future::Future;

use crate::core::{Spawn, TowerError};

/// Tokio-based spawner that runs landing tasks on a tokio runtime.
#[derive(Clone, Debug)]
pub struct TokioSpawner {
    handle: tokio::runtime::Handle,
}

impl TokioSpawner {
    /// Create a `TokioSpawner` from a tokio runtime handle.
    #[must_use]
    pub const fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Spawner for the runtime the caller is running on.
    ///
    /// # Errors
    ///
    /// Returns `TowerError::Runtime` when called outside a tokio runtime.
    pub fn current() -> Result<Self, TowerError> {
        tokio::runtime::Handle::try_current()
            .map(Self::new)
            .map_err(|e| TowerError::Runtime(e.to_string()))
    }
}

impl Spawn for TokioSpawner {
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(fut);
    }
}
