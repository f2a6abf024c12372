//! Tests for utility functions

use std::sync::Arc;

use campfire_looper::util::{init_tracing, now_ms, Clock, ManualClock, SystemClock};

#[test]
fn test_manual_clock_shared_between_clones() {
    let clock = ManualClock::new(100);
    let shared: Arc<dyn Clock> = Arc::new(clock.clone());

    assert_eq!(clock.advance(50), 150);
    assert_eq!(shared.now_ms(), 150);
}

#[test]
fn test_manual_clock_set_never_rewinds() {
    let clock = ManualClock::new(1_000);
    clock.set(400);
    assert_eq!(clock.now_ms(), 1_000);
    clock.set(2_000);
    assert_eq!(clock.now_ms(), 2_000);
}

#[test]
fn test_system_clock_tracks_wall_time() {
    let before = now_ms();
    let reading = SystemClock.now_ms();
    assert!(reading >= before);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
