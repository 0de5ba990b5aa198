//! Counting slot pools for runways and gates.
//!
//! A [`SlotPool`] is a blocking bounded counter built on a `parking_lot`
//! mutex and condvar. Acquiring returns a [`SlotPermit`]; dropping the permit
//! releases the slot and wakes one waiter. Release never blocks.
//!
//! [`AsyncSlotPool`] is the async counterpart built on a
//! `tokio::sync::Semaphore`: waiters are parked tasks rather than threads.
//! Both kinds report the same [`SlotPoolStats`].

use std::fmt;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use serde::Serialize;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::core::TowerError;

/// Occupancy counters protected by the pool mutex.
#[derive(Debug, Default)]
struct Occupancy {
    in_use: usize,
    peak_in_use: usize,
}

impl Occupancy {
    fn take(&mut self, pool: &'static str) {
        self.in_use += 1;
        self.peak_in_use = self.peak_in_use.max(self.in_use);
        tracing::trace!(pool, in_use = self.in_use, "slot acquired");
    }

    fn release(&mut self, pool: &'static str) {
        self.in_use -= 1;
        tracing::trace!(pool, in_use = self.in_use, "slot released");
    }

    const fn stats(&self, capacity: usize) -> SlotPoolStats {
        SlotPoolStats {
            capacity,
            in_use: self.in_use,
            peak_in_use: self.peak_in_use,
        }
    }
}

fn check_capacity(name: &str, capacity: usize) -> Result<(), TowerError> {
    if capacity == 0 {
        return Err(TowerError::InvalidConfig(format!(
            "{name} pool capacity must be greater than 0"
        )));
    }
    Ok(())
}

struct PoolInner {
    name: &'static str,
    capacity: usize,
    occupancy: Mutex<Occupancy>,
    released: Condvar,
}

/// Point-in-time view of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotPoolStats {
    /// Configured number of slots.
    pub capacity: usize,
    /// Slots currently held.
    pub in_use: usize,
    /// Highest number of slots ever held at once.
    pub peak_in_use: usize,
}

/// Bounded pool of interchangeable slots.
#[derive(Clone)]
pub struct SlotPool {
    inner: Arc<PoolInner>,
}

impl SlotPool {
    /// Create a pool with `capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns `TowerError::InvalidConfig` when `capacity` is zero, since every
    /// acquire would block forever.
    pub fn new(name: &'static str, capacity: usize) -> Result<Self, TowerError> {
        check_capacity(name, capacity)?;
        Ok(Self {
            inner: Arc::new(PoolInner {
                name,
                capacity,
                occupancy: Mutex::new(Occupancy::default()),
                released: Condvar::new(),
            }),
        })
    }

    /// Pool name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// Configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Block the current thread until a slot is free, then take it.
    #[must_use = "dropping the permit releases the slot immediately"]
    pub fn acquire(&self) -> SlotPermit {
        let mut occupancy = self.inner.occupancy.lock();
        self.inner
            .released
            .wait_while(&mut occupancy, |o| o.in_use >= self.inner.capacity);
        self.take(&mut occupancy)
    }

    /// Take a slot if one is free right now.
    pub fn try_acquire(&self) -> Option<SlotPermit> {
        let mut occupancy = self.inner.occupancy.lock();
        if occupancy.in_use >= self.inner.capacity {
            return None;
        }
        Some(self.take(&mut occupancy))
    }

    /// Current occupancy.
    #[must_use]
    pub fn stats(&self) -> SlotPoolStats {
        self.inner.occupancy.lock().stats(self.inner.capacity)
    }

    fn take(&self, occupancy: &mut Occupancy) -> SlotPermit {
        occupancy.take(self.inner.name);
        SlotPermit {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for SlotPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotPool")
            .field("name", &self.inner.name)
            .field("stats", &self.stats())
            .finish()
    }
}

/// A held slot. Released on drop.
#[must_use = "dropping the permit releases the slot immediately"]
pub struct SlotPermit {
    inner: Arc<PoolInner>,
}

impl SlotPermit {
    /// Name of the pool this permit belongs to.
    #[must_use]
    pub fn pool_name(&self) -> &'static str {
        self.inner.name
    }
}

impl fmt::Debug for SlotPermit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotPermit")
            .field("pool", &self.inner.name)
            .finish()
    }
}

impl Drop for SlotPermit {
    fn drop(&mut self) {
        self.inner.occupancy.lock().release(self.inner.name);
        self.inner.released.notify_one();
    }
}

struct AsyncPoolInner {
    name: &'static str,
    capacity: usize,
    semaphore: Arc<Semaphore>,
    occupancy: Mutex<Occupancy>,
}

/// Bounded pool of interchangeable slots for async callers.
///
/// Waiting tasks queue on a tokio semaphore in FIFO order. Cancelling a
/// pending [`AsyncSlotPool::acquire`] leaves the pool untouched.
#[derive(Clone)]
pub struct AsyncSlotPool {
    inner: Arc<AsyncPoolInner>,
}

impl AsyncSlotPool {
    /// Create a pool with `capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns `TowerError::InvalidConfig` when `capacity` is zero.
    pub fn new(name: &'static str, capacity: usize) -> Result<Self, TowerError> {
        check_capacity(name, capacity)?;
        Ok(Self {
            inner: Arc::new(AsyncPoolInner {
                name,
                capacity,
                semaphore: Arc::new(Semaphore::new(capacity)),
                occupancy: Mutex::new(Occupancy::default()),
            }),
        })
    }

    /// Pool name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// Configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Wait until a slot is free, then take it.
    ///
    /// # Errors
    ///
    /// Returns `TowerError::Runtime` if the underlying semaphore was closed.
    pub async fn acquire(&self) -> Result<AsyncSlotPermit, TowerError> {
        let permit = Arc::clone(&self.inner.semaphore)
            .acquire_owned()
            .await
            .map_err(|e| TowerError::Runtime(format!("{} pool closed: {e}", self.inner.name)))?;
        Ok(self.take(permit))
    }

    /// Take a slot if one is free right now.
    pub fn try_acquire(&self) -> Option<AsyncSlotPermit> {
        Arc::clone(&self.inner.semaphore)
            .try_acquire_owned()
            .ok()
            .map(|permit| self.take(permit))
    }

    /// Current occupancy.
    #[must_use]
    pub fn stats(&self) -> SlotPoolStats {
        self.inner.occupancy.lock().stats(self.inner.capacity)
    }

    fn take(&self, permit: OwnedSemaphorePermit) -> AsyncSlotPermit {
        self.inner.occupancy.lock().take(self.inner.name);
        AsyncSlotPermit {
            inner: Arc::clone(&self.inner),
            _permit: permit,
        }
    }
}

impl fmt::Debug for AsyncSlotPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncSlotPool")
            .field("name", &self.inner.name)
            .field("stats", &self.stats())
            .finish()
    }
}

/// A held slot from an [`AsyncSlotPool`]. Released on drop.
#[must_use = "dropping the permit releases the slot immediately"]
pub struct AsyncSlotPermit {
    inner: Arc<AsyncPoolInner>,
    // Returned to the semaphore after `drop` below has updated the counters.
    _permit: OwnedSemaphorePermit,
}

impl AsyncSlotPermit {
    /// Name of the pool this permit belongs to.
    #[must_use]
    pub fn pool_name(&self) -> &'static str {
        self.inner.name
    }
}

impl fmt::Debug for AsyncSlotPermit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncSlotPermit")
            .field("pool", &self.inner.name)
            .finish()
    }
}

impl Drop for AsyncSlotPermit {
    fn drop(&mut self) {
        self.inner.occupancy.lock().release(self.inner.name);
    }
}
