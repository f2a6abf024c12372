//! Tests for the trace log

use campfire_looper::core::{build_trace_event, TraceKind, TraceLog, TraceSink, DEFAULT_TRACE_CAPACITY};

#[test]
fn test_trace_log_newest_first() {
    let mut log = TraceLog::new(10);

    log.record(build_trace_event(0, TraceKind::Prepared, None, "prepare() on thread main"));
    log.record(build_trace_event(5, TraceKind::Started, None, "loop() started, waiting for work"));

    let events = log.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, TraceKind::Started);
    assert_eq!(events[1].kind, TraceKind::Prepared);
    assert_eq!(log.latest().map(|e| e.at_ms), Some(5));
}

#[test]
fn test_trace_log_overflow_drops_oldest() {
    let mut log = TraceLog::new(2);

    log.record(build_trace_event(1, TraceKind::Enqueued, Some(1), "first"));
    log.record(build_trace_event(2, TraceKind::Enqueued, Some(2), "second"));
    log.record(build_trace_event(3, TraceKind::Enqueued, Some(3), "third"));

    let events = log.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].message, "third");
    assert_eq!(events[1].message, "second");
}

#[test]
fn test_render_line() {
    let event = build_trace_event(1_300, TraceKind::Recycled, Some(7), "item what=3 recycled back to pool (5 available)");
    assert_eq!(
        event.render(),
        "[1300ms] recycle: item what=3 recycled back to pool (5 available)"
    );
}

#[test]
fn test_default_capacity() {
    let log = TraceLog::default();
    assert!(log.is_empty());
    assert_eq!(DEFAULT_TRACE_CAPACITY, 50);
}
