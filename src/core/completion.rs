//! Completion latch counting aircraft that have not yet left the gate.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::core::TowerError;

struct LatchInner {
    pending: Mutex<usize>,
    drained: Condvar,
}

/// Wait-group style counter: `add` on arrival, `done` on completion,
/// `wait` until the count returns to zero.
#[derive(Clone)]
pub struct CompletionLatch {
    inner: Arc<LatchInner>,
}

impl CompletionLatch {
    /// Create a latch with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(LatchInner {
                pending: Mutex::new(0),
                drained: Condvar::new(),
            }),
        }
    }

    /// Register `n` more units of work.
    pub fn add(&self, n: usize) {
        *self.inner.pending.lock() += n;
    }

    /// Mark one unit of work finished.
    pub fn done(&self) {
        let mut pending = self.inner.pending.lock();
        if *pending == 0 {
            tracing::error!("completion latch released more times than registered");
            return;
        }
        *pending -= 1;
        if *pending == 0 {
            self.inner.drained.notify_all();
        }
    }

    /// Units of work still outstanding.
    #[must_use]
    pub fn pending(&self) -> usize {
        *self.inner.pending.lock()
    }

    /// Block until nothing is pending.
    pub fn wait(&self) {
        let mut pending = self.inner.pending.lock();
        self.inner.drained.wait_while(&mut pending, |p| *p > 0);
    }

    /// Block until nothing is pending or `timeout` elapses. Returns `true` if drained.
    #[must_use]
    pub fn wait_for(&self, timeout: Duration) -> bool {
        let mut pending = self.inner.pending.lock();
        let result = self
            .inner
            .drained
            .wait_while_for(&mut pending, |p| *p > 0, timeout);
        !result.timed_out() || *pending == 0
    }

    /// Wait from async code without blocking a runtime worker.
    ///
    /// # Errors
    ///
    /// Returns `TowerError::Runtime` if the blocking wait could not be joined.
    pub async fn wait_async(&self) -> Result<(), TowerError> {
        if self.pending() == 0 {
            return Ok(());
        }
        let latch = self.clone();
        tokio::task::spawn_blocking(move || latch.wait())
            .await
            .map_err(|e| TowerError::Runtime(format!("completion wait failed: {e}")))
    }
}

impl Default for CompletionLatch {
    fn default() -> Self {
        Self::new()
    }
}
