//! Tower event log.
//!
//! Every scheduling decision produces a [`TowerEvent`] wrapped in an
//! [`EventRecord`] stamped with the time since the run started. Records are
//! handed to an [`EventSink`]; the tower serializes calls to the sink behind
//! its own mutex so each line is written whole.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::core::{AircraftId, Category};
use crate::util::clock::now_ms;

/// Scheduling event emitted by the tower.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TowerEvent {
    /// Admitted straight into the active set.
    Connected {
        /// Aircraft identifier.
        aircraft: AircraftId,
        /// Priority category.
        category: Category,
        /// Passenger count.
        passengers: u32,
    },
    /// Active set full; parked in overflow.
    HeldOutside {
        /// Aircraft identifier.
        aircraft: AircraftId,
        /// Priority category.
        category: Category,
        /// Passenger count.
        passengers: u32,
    },
    /// Moved from overflow into the active set.
    Promoted {
        /// Aircraft identifier.
        aircraft: AircraftId,
        /// Priority category.
        category: Category,
        /// Passenger count.
        passengers: u32,
    },
    /// Selected for a runway.
    Landing {
        /// Aircraft identifier.
        aircraft: AircraftId,
        /// Priority category.
        category: Category,
    },
    /// Runway stage finished.
    Landed {
        /// Aircraft identifier.
        aircraft: AircraftId,
        /// Priority category.
        category: Category,
        /// Seconds since the aircraft connected.
        connect_to_landed_secs: f64,
    },
    /// Holding a gate.
    AtGate {
        /// Aircraft identifier.
        aircraft: AircraftId,
        /// Priority category.
        category: Category,
    },
    /// Gate stage finished.
    Disembarked {
        /// Aircraft identifier.
        aircraft: AircraftId,
        /// Priority category.
        category: Category,
        /// Seconds spent in the gate stage.
        landed_to_departed_secs: f64,
    },
}

impl TowerEvent {
    /// Aircraft the event is about.
    #[must_use]
    pub const fn aircraft(&self) -> AircraftId {
        match self {
            Self::Connected { aircraft, .. }
            | Self::HeldOutside { aircraft, .. }
            | Self::Promoted { aircraft, .. }
            | Self::Landing { aircraft, .. }
            | Self::Landed { aircraft, .. }
            | Self::AtGate { aircraft, .. }
            | Self::Disembarked { aircraft, .. } => *aircraft,
        }
    }

    /// Category of the aircraft the event is about.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Connected { category, .. }
            | Self::HeldOutside { category, .. }
            | Self::Promoted { category, .. }
            | Self::Landing { category, .. }
            | Self::Landed { category, .. }
            | Self::AtGate { category, .. }
            | Self::Disembarked { category, .. } => *category,
        }
    }

    /// Short machine-readable name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::HeldOutside { .. } => "held_outside",
            Self::Promoted { .. } => "promoted",
            Self::Landing { .. } => "landing",
            Self::Landed { .. } => "landed",
            Self::AtGate { .. } => "at_gate",
            Self::Disembarked { .. } => "disembarked",
        }
    }
}

impl fmt::Display for TowerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected { aircraft, category, passengers } => write!(
                f,
                "aircraft {aircraft} ({category}, {passengers} passengers): connected to tower"
            ),
            Self::HeldOutside { aircraft, category, passengers } => write!(
                f,
                "aircraft {aircraft} ({category}, {passengers} passengers): holding outside active wait"
            ),
            Self::Promoted { aircraft, category, passengers } => write!(
                f,
                "aircraft {aircraft} ({category}, {passengers} passengers): promoted to active wait"
            ),
            Self::Landing { aircraft, category } => {
                write!(f, "aircraft {aircraft} ({category}): landing on runway")
            }
            Self::Landed { aircraft, category, connect_to_landed_secs } => write!(
                f,
                "aircraft {aircraft} ({category}): landed {connect_to_landed_secs:.2}s after connecting"
            ),
            Self::AtGate { aircraft, category } => {
                write!(f, "aircraft {aircraft} ({category}): at disembarkation gate")
            }
            Self::Disembarked { aircraft, category, landed_to_departed_secs } => write!(
                f,
                "aircraft {aircraft} ({category}): disembarked after {landed_to_departed_secs:.2}s at gate"
            ),
        }
    }
}

/// A timestamped event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    /// Seconds since the tower started.
    pub elapsed_secs: f64,
    /// Wall-clock milliseconds since the Unix epoch.
    pub recorded_at_ms: u128,
    /// The event itself.
    pub event: TowerEvent,
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.2}s] {}", self.elapsed_secs, self.event)
    }
}

/// Event sink abstraction.
pub trait EventSink: Send {
    /// Record an event.
    fn record(&mut self, record: EventRecord);
}

/// Sink that forwards events to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn record(&mut self, record: EventRecord) {
        tracing::info!(
            kind = record.event.kind(),
            aircraft = record.event.aircraft(),
            category = %record.event.category(),
            elapsed_secs = record.elapsed_secs,
            "{record}"
        );
    }
}

/// Bounded in-memory sink. Clones share the same buffer, so a caller can keep
/// a handle while the tower owns another.
#[derive(Debug, Clone)]
pub struct InMemoryEventSink {
    records: Arc<Mutex<VecDeque<EventRecord>>>,
    max_records: usize,
}

impl InMemoryEventSink {
    /// Create a sink retaining at most `max_records` records; the oldest are evicted first.
    #[must_use]
    pub fn new(max_records: usize) -> Self {
        Self {
            records: Arc::new(Mutex::new(VecDeque::with_capacity(max_records.min(4096)))),
            max_records,
        }
    }

    /// Snapshot of stored records in emission order.
    #[must_use]
    pub fn records(&self) -> Vec<EventRecord> {
        self.records.lock().iter().cloned().collect()
    }

    /// Snapshot of stored events without timestamps.
    #[must_use]
    pub fn events(&self) -> Vec<TowerEvent> {
        self.records.lock().iter().map(|r| r.event.clone()).collect()
    }
}

impl EventSink for InMemoryEventSink {
    fn record(&mut self, record: EventRecord) {
        let mut records = self.records.lock();
        if self.max_records == 0 {
            return;
        }
        if records.len() >= self.max_records {
            records.pop_front();
        }
        records.push_back(record);
    }
}

/// Helper to stamp an event.
#[must_use]
pub fn build_event_record(elapsed_secs: f64, event: TowerEvent) -> EventRecord {
    EventRecord {
        elapsed_secs,
        recorded_at_ms: now_ms(),
        event,
    }
}
