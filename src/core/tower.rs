//! Control tower: admission, priority selection, and the dispatch loop.
//!
//! All queue and metrics state lives in one [`TowerState`] behind the primary
//! `parking_lot::Mutex`. A dedicated dispatch thread repeatedly takes a
//! runway slot, tops the active set up from overflow, and hands the
//! highest-priority aircraft to an async landing task. When nothing is
//! waiting it gives the runway back and parks on a `Condvar` until an
//! admission or a gate release wakes it.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use serde::Serialize;

use crate::config::TowerConfig;
use crate::core::events::{build_event_record, EventSink, TowerEvent};
use crate::core::{
    stages, Aircraft, AircraftId, AsyncSlotPool, Category, CompletionLatch, HoldingQueue,
    SlotPool, SlotPoolStats, StageMetrics, TowerError,
};
use crate::util::clock::RunClock;

/// Abstraction for spawning stage processing on a runtime.
pub trait Spawn {
    /// Spawn a future that runs to completion in the background.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Where an admitted aircraft was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Admission {
    /// Placed in the active set, eligible for selection.
    Active,
    /// Active set was full; placed in overflow.
    Overflow,
}

/// State guarded by the primary lock.
pub(crate) struct TowerState {
    pub(crate) active: HoldingQueue,
    pub(crate) overflow: HoldingQueue,
    pub(crate) metrics: StageMetrics,
    peak_active: usize,
    shutdown: bool,
}

impl TowerState {
    fn new(max_active: usize) -> Self {
        Self {
            active: HoldingQueue::with_capacity(max_active),
            overflow: HoldingQueue::new(),
            metrics: StageMetrics::default(),
            peak_active: 0,
            shutdown: false,
        }
    }

    fn push_active(&mut self, aircraft: Aircraft) {
        self.active.push(aircraft);
        self.peak_active = self.peak_active.max(self.active.len());
    }
}

/// Everything the dispatch thread and landing tasks share.
pub(crate) struct TowerShared {
    pub(crate) config: TowerConfig,
    pub(crate) state: Mutex<TowerState>,
    pub(crate) work_available: Condvar,
    pub(crate) runways: SlotPool,
    pub(crate) gates: AsyncSlotPool,
    pub(crate) completion: CompletionLatch,
    clock: RunClock,
    events: Mutex<Box<dyn EventSink>>,
}

impl TowerShared {
    /// Stamp and record an event. Takes the sink lock only.
    pub(crate) fn emit(&self, event: TowerEvent) {
        let record = build_event_record(self.clock.elapsed_secs(), event);
        self.events.lock().record(record);
    }

    /// Move overflow aircraft into the active set while there is room.
    fn promote(&self, state: &mut TowerState) {
        while state.active.len() < self.config.max_active {
            let Some(aircraft) = state.overflow.pop() else {
                break;
            };
            self.emit(TowerEvent::Promoted {
                aircraft: aircraft.id(),
                category: aircraft.category(),
                passengers: aircraft.passengers(),
            });
            state.push_active(aircraft);
        }
    }
}

/// Ids and categories held in each queue, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueueSnapshot {
    /// Active set contents.
    pub active: Vec<(AircraftId, Category)>,
    /// Overflow contents.
    pub overflow: Vec<(AircraftId, Category)>,
    /// Largest active set size observed so far.
    pub peak_active: usize,
}

/// Runway and gate scheduler.
///
/// Dropping the tower signals the dispatch thread to stop; landings already
/// in flight keep running on the spawner's runtime.
pub struct ControlTower {
    shared: Arc<TowerShared>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl ControlTower {
    /// Validate `config`, create the slot pools, and start the dispatch thread.
    ///
    /// # Errors
    ///
    /// Returns `TowerError::InvalidConfig` for a degenerate configuration and
    /// `TowerError::Spawn` if the dispatch thread cannot be started.
    pub fn start<S>(
        config: TowerConfig,
        spawner: S,
        events: Box<dyn EventSink>,
    ) -> Result<Self, TowerError>
    where
        S: Spawn + Send + 'static,
    {
        config.validate()?;

        let shared = Arc::new(TowerShared {
            runways: SlotPool::new("runway", config.runways)?,
            gates: AsyncSlotPool::new("gate", config.gates)?,
            state: Mutex::new(TowerState::new(config.max_active)),
            work_available: Condvar::new(),
            completion: CompletionLatch::new(),
            clock: RunClock::start(),
            events: Mutex::new(events),
            config,
        });

        let dispatcher = {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name("tower-dispatch".into())
                .spawn(move || dispatch_loop(&shared, &spawner))?
        };

        tracing::info!(
            runways = shared.config.runways,
            gates = shared.config.gates,
            max_active = shared.config.max_active,
            "control tower started"
        );

        Ok(Self {
            shared,
            dispatcher: Mutex::new(Some(dispatcher)),
        })
    }

    /// Admit an arriving aircraft into the active set if it has room,
    /// otherwise into overflow. Never drops the aircraft.
    pub fn admit(&self, aircraft: Aircraft) -> Admission {
        let shared = &self.shared;
        shared.completion.add(1);

        let (id, category, passengers) = (aircraft.id(), aircraft.category(), aircraft.passengers());
        let mut state = shared.state.lock();
        if state.active.len() < shared.config.max_active {
            state.push_active(aircraft);
            shared.emit(TowerEvent::Connected { aircraft: id, category, passengers });
            shared.work_available.notify_one();
            Admission::Active
        } else {
            state.overflow.push(aircraft);
            shared.emit(TowerEvent::HeldOutside { aircraft: id, category, passengers });
            Admission::Overflow
        }
    }

    /// Configuration the tower was started with.
    #[must_use]
    pub fn config(&self) -> &TowerConfig {
        &self.shared.config
    }

    /// Seconds since the tower started.
    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        self.shared.clock.elapsed_secs()
    }

    /// Contents of both queues, taken under the primary lock.
    #[must_use]
    pub fn snapshot(&self) -> QueueSnapshot {
        let state = self.shared.state.lock();
        let ids = |q: &HoldingQueue| -> Vec<(AircraftId, Category)> {
            q.snapshot().iter().map(|a| (a.id(), a.category())).collect()
        };
        QueueSnapshot {
            active: ids(&state.active),
            overflow: ids(&state.overflow),
            peak_active: state.peak_active,
        }
    }

    /// Copy of the recorded stage samples.
    #[must_use]
    pub fn metrics(&self) -> StageMetrics {
        self.shared.state.lock().metrics.clone()
    }

    /// Runway pool occupancy.
    #[must_use]
    pub fn runway_stats(&self) -> SlotPoolStats {
        self.shared.runways.stats()
    }

    /// Gate pool occupancy.
    #[must_use]
    pub fn gate_stats(&self) -> SlotPoolStats {
        self.shared.gates.stats()
    }

    /// Aircraft admitted but not yet through the gate stage.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.shared.completion.pending()
    }

    /// Block until every admitted aircraft has finished both stages.
    pub fn wait_until_idle(&self) {
        self.shared.completion.wait();
    }

    /// Like [`Self::wait_until_idle`] with a timeout. Returns `true` if idle.
    #[must_use]
    pub fn wait_until_idle_for(&self, timeout: Duration) -> bool {
        self.shared.completion.wait_for(timeout)
    }

    /// Wait for every admitted aircraft from async code.
    ///
    /// # Errors
    ///
    /// Returns `TowerError::Runtime` if the blocking wait could not be joined.
    pub async fn wait_until_idle_async(&self) -> Result<(), TowerError> {
        self.shared.completion.wait_async().await
    }

    /// Signal the dispatch thread to stop.
    ///
    /// The thread exits the next time it observes the flag: right away if it
    /// is idle, or after its pending runway acquisition otherwise. Aircraft
    /// still queued after shutdown are never dispatched.
    pub fn shutdown(&self) {
        {
            let mut state = self.shared.state.lock();
            if state.shutdown {
                return;
            }
            state.shutdown = true;
        }
        self.shared.work_available.notify_all();
        self.reap_dispatcher();
        tracing::info!("control tower shutdown requested");
    }

    /// Whether the dispatch thread has exited, either after [`Self::shutdown`]
    /// or because it panicked.
    #[must_use]
    pub fn dispatcher_finished(&self) -> bool {
        self.reap_dispatcher();
        self.dispatcher.lock().is_none()
    }

    /// Join the dispatch thread if it has already exited, logging a panic.
    fn reap_dispatcher(&self) {
        let mut dispatcher = self.dispatcher.lock();
        if !dispatcher.as_ref().is_some_and(JoinHandle::is_finished) {
            return;
        }
        if let Some(handle) = dispatcher.take() {
            if let Err(panic) = handle.join() {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(%message, "dispatch thread panicked");
            }
        }
    }
}

impl fmt::Debug for ControlTower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlTower")
            .field("config", &self.shared.config)
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

impl Drop for ControlTower {
    fn drop(&mut self) {
        // Don't join: the dispatch thread may be waiting on a runway held by a landing.
        self.shutdown();
    }
}

/// Dispatch loop run on the `tower-dispatch` thread.
fn dispatch_loop<S: Spawn>(shared: &Arc<TowerShared>, spawner: &S) {
    tracing::debug!("dispatch loop started");
    loop {
        let runway = shared.runways.acquire();

        let mut state = shared.state.lock();
        if state.shutdown {
            break;
        }

        shared.promote(&mut state);

        if let Some(aircraft) = state.active.pop() {
            shared.emit(TowerEvent::Landing {
                aircraft: aircraft.id(),
                category: aircraft.category(),
            });
            drop(state);
            tracing::debug!(aircraft = aircraft.id(), "cleared for landing");
            spawner.spawn(stages::land(Arc::clone(shared), aircraft, runway));
        } else {
            // Nothing to land: give the runway back and sleep until new work arrives.
            drop(runway);
            shared.work_available.wait(&mut state);
            if state.shutdown {
                break;
            }
        }
    }
    tracing::debug!("dispatch loop stopped");
}
