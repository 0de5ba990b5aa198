//! Tests for event sinks and formatting

use control_tower::core::{build_event_record, Category, EventSink, InMemoryEventSink, TowerEvent};

fn landing(id: u64) -> TowerEvent {
    TowerEvent::Landing {
        aircraft: id,
        category: Category::B,
    }
}

#[test]
fn test_in_memory_sink_shares_buffer() {
    let sink = InMemoryEventSink::new(10);
    let mut writer = sink.clone();

    writer.record(build_event_record(0.5, landing(1)));
    assert_eq!(sink.records().len(), 1);
    assert_eq!(sink.events(), vec![landing(1)]);
}

#[test]
fn test_in_memory_sink_overflow() {
    let mut sink = InMemoryEventSink::new(2);

    sink.record(build_event_record(0.1, landing(1)));
    sink.record(build_event_record(0.2, landing(2)));
    sink.record(build_event_record(0.3, landing(3)));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].aircraft(), 2); // First one popped
    assert_eq!(events[1].aircraft(), 3);
}

#[test]
fn test_record_display() {
    let record = build_event_record(
        12.5,
        TowerEvent::Connected {
            aircraft: 7,
            category: Category::A,
            passengers: 120,
        },
    );
    assert_eq!(
        record.to_string(),
        "[12.50s] aircraft 7 (A, 120 passengers): connected to tower"
    );
    assert!(record.recorded_at_ms > 0);
}

#[test]
fn test_elapsed_events_display() {
    let landed = TowerEvent::Landed {
        aircraft: 3,
        category: Category::C,
        connect_to_landed_secs: 2.5,
    };
    assert_eq!(landed.to_string(), "aircraft 3 (C): landed 2.50s after connecting");
    assert_eq!(landed.kind(), "landed");
    assert_eq!(landed.category(), Category::C);
}

#[test]
fn test_event_serializes_with_kind_tag() {
    let json = serde_json::to_value(TowerEvent::AtGate {
        aircraft: 4,
        category: Category::A,
    })
    .unwrap();
    assert_eq!(json["kind"], "at_gate");
    assert_eq!(json["aircraft"], 4);
    assert_eq!(json["category"], "A");
}
