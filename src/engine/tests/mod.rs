
use crate::config::Config;
use crate::engine::SyncEngine;
use crate::engine::test_helpers::{MockProvider, snapshot};
use crate::types::{Event, ItemStatus};

// Config::validate rejects a zero capacity, but nothing forces callers
// through it; construction must clamp instead of panicking.
#[tokio::test]
async fn zero_event_capacity_is_clamped_at_construction() {
    let provider = MockProvider::new();
    let config = Config {
        event_channel_capacity: 0,
        dispatch_delay_ms: 0,
        ..Default::default()
    };
    let mut engine = SyncEngine::new(provider, config);
    let mut events = engine.subscribe();

    engine.snapshots = vec![snapshot(1, "a", 100, 200, ItemStatus::Installed)];
    engine.build_queue(false);

    let event = events
        .try_recv()
        .expect("clamped channel should still deliver events");
    assert_eq!(event, Event::QueueBuilt { count: 1 });
}
