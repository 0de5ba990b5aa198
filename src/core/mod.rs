//! Scheduling core: aircraft, holding queues, slot pools, and the dispatch loop.

pub mod aircraft;
pub mod completion;
pub mod error;
pub mod events;
pub mod holding;
pub mod metrics;
pub mod slot_pool;
mod stages;
pub mod tower;

pub use aircraft::{Aircraft, AircraftId, Category};
pub use completion::CompletionLatch;
pub use error::{AppResult, TowerError};
pub use events::{
    build_event_record, EventRecord, EventSink, InMemoryEventSink, TowerEvent, TracingEventSink,
};
pub use holding::HoldingQueue;
pub use metrics::{mean, StageMetrics, StageSamples};
pub use slot_pool::{AsyncSlotPermit, AsyncSlotPool, SlotPermit, SlotPool, SlotPoolStats};
pub use tower::{Admission, ControlTower, QueueSnapshot, Spawn};
