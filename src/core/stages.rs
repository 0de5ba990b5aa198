//! Runway and gate stage processors.

use std::sync::Arc;
use std::time::Instant;

use crate::core::events::TowerEvent;
use crate::core::tower::TowerShared;
use crate::core::{Aircraft, SlotPermit};

/// Run an aircraft through the runway stage and then the gate stage.
///
/// `runway` is the slot the dispatch loop reserved; it is released as soon as
/// the runway stage ends.
pub(crate) async fn land(shared: Arc<TowerShared>, aircraft: Aircraft, runway: SlotPermit) {
    runway_stage(&shared, &aircraft, runway).await;
    gate_stage(&shared, &aircraft).await;
}

async fn runway_stage(shared: &TowerShared, aircraft: &Aircraft, runway: SlotPermit) {
    tokio::time::sleep(shared.config.runway_hold()).await;

    let secs = aircraft.connected_at().elapsed().as_secs_f64();
    shared.emit(TowerEvent::Landed {
        aircraft: aircraft.id(),
        category: aircraft.category(),
        connect_to_landed_secs: secs,
    });
    shared.state.lock().metrics.connect_to_landed.record(secs);

    drop(runway);
}

async fn gate_stage(shared: &TowerShared, aircraft: &Aircraft) {
    match shared.gates.acquire().await {
        Ok(gate) => {
            shared.emit(TowerEvent::AtGate {
                aircraft: aircraft.id(),
                category: aircraft.category(),
            });

            let entered = Instant::now();
            tokio::time::sleep(shared.config.gate_hold(aircraft.category())).await;
            let secs = entered.elapsed().as_secs_f64();

            shared.emit(TowerEvent::Disembarked {
                aircraft: aircraft.id(),
                category: aircraft.category(),
                landed_to_departed_secs: secs,
            });
            shared.state.lock().metrics.landed_to_departed.record(secs);

            drop(gate);
            shared.work_available.notify_one();
        }
        Err(e) => {
            tracing::error!(aircraft = aircraft.id(), error = %e, "gate stage skipped");
        }
    }
    shared.completion.done();
}
