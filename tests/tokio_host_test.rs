//! Tokio host behaviour on a paused clock.
//!
//! With `start_paused` the runtime jumps straight to the next timer whenever
//! every task is idle, so these tests run instantly and deterministically.

#![cfg(feature = "tokio-runtime")]

use std::time::Duration;

use campfire_looper::core::{Looper, RecyclePolicy, SchedulerError, SchedulerState, TraceKind};
use campfire_looper::runtime::{TokioHost, TokioSpawner};
use tokio::time::sleep;

fn host() -> TokioHost {
    TokioHost::new(Looper::with_defaults(), TokioSpawner::current())
}

#[tokio::test(start_paused = true)]
async fn dispatches_on_tick_and_completes_after_processing() {
    let host = host();
    host.prepare().unwrap();
    host.start().unwrap();
    let item = host.submit(5, 0, false);

    sleep(Duration::from_millis(510)).await;
    assert_eq!(host.in_flight().map(|i| i.id), Some(item.id));
    assert!(host.queue_snapshot().is_empty());

    sleep(Duration::from_millis(800)).await;
    assert!(host.in_flight().is_none());
    assert_eq!(host.state(), SchedulerState::Running);
}

#[tokio::test(start_paused = true)]
async fn nothing_dispatches_before_start() {
    let host = host();
    host.prepare().unwrap();
    let item = host.submit(7, 0, false);

    sleep(Duration::from_secs(5)).await;
    assert_eq!(host.queue_snapshot(), vec![item]);
    assert!(host.in_flight().is_none());
}

#[tokio::test(start_paused = true)]
async fn stop_lets_in_flight_item_finish() {
    let host = host();
    host.prepare().unwrap();
    host.start().unwrap();
    let item = host.submit(3, 0, true);
    assert_eq!(host.pool_available(), 4);

    sleep(Duration::from_millis(600)).await;
    assert_eq!(host.in_flight().map(|i| i.id), Some(item.id));
    assert!(host.stop());
    host.submit(4, 0, false);

    sleep(Duration::from_secs(3)).await;
    assert!(host.in_flight().is_none());
    assert_eq!(host.pool_available(), 5);
    assert_eq!(host.queue_snapshot().len(), 1);
    assert_eq!(host.state(), SchedulerState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn restart_retires_the_old_ticker() {
    let host = host();
    host.prepare().unwrap();
    host.start().unwrap();
    let first = host.submit(1, 0, false);
    host.submit(2, 0, false);

    sleep(Duration::from_millis(100)).await;
    assert!(host.stop());
    sleep(Duration::from_millis(100)).await;
    host.start().unwrap();

    // The new ticker first fires at 700ms, so the first item is still being
    // processed at 1400ms. A surviving old ticker would have finished it by 1300ms.
    sleep(Duration::from_millis(1_200)).await;
    assert_eq!(host.in_flight().map(|i| i.id), Some(first.id));
    assert_eq!(host.queue_snapshot().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn named_handlers_share_one_looper() {
    let host = host();
    host.prepare().unwrap();
    let alice = host.handler("Alice");
    let bob = alice.clone();
    let carol = host.handler("Carol");

    let a = alice.send_delayed(1, 200);
    let c = carol.obtain_and_send(2);
    let b = bob.send(3);

    assert_eq!(a.origin, "Alice");
    assert_eq!(b.origin, "Alice");
    assert_eq!(c.origin, "Carol");
    assert!(c.pooled);

    let order: Vec<u64> = host.queue_snapshot().iter().map(|i| i.id).collect();
    assert_eq!(order, vec![c.id, b.id, a.id]);
}

#[tokio::test(start_paused = true)]
async fn recycle_policy_switch_applies_to_fresh_items() {
    let host = host();
    host.prepare().unwrap();
    host.start().unwrap();
    host.set_recycle_policy(RecyclePolicy::Always);
    host.submit(8, 0, false);

    sleep(Duration::from_millis(1_400)).await;
    assert_eq!(host.pool_available(), 6);
    let latest = host.with_looper(|looper| looper.trace_events()[0].kind);
    assert_eq!(latest, TraceKind::Recycled);
}

#[tokio::test(start_paused = true)]
async fn rejected_transitions_spawn_nothing() {
    let host = host();
    assert_eq!(host.start(), Err(SchedulerError::NotPrepared));
    assert!(!host.stop());

    let snapshot = host.snapshot();
    assert_eq!(snapshot.state, SchedulerState::Uninitialized);
    assert_eq!(snapshot.trace.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn looper_reads_leave_dispatch_to_the_host() {
    let host = host();
    host.prepare().unwrap();
    host.start().unwrap();
    let first = host.submit(1, 0, false);
    host.submit(2, 0, false);

    sleep(Duration::from_millis(600)).await;
    let (in_flight, queued) = host.with_looper(|looper| (looper.in_flight().map(|i| i.id), looper.queue_len()));
    assert_eq!(in_flight, Some(first.id));
    assert_eq!(queued, 1);

    // Both items complete on the host's own timers.
    sleep(Duration::from_secs(5)).await;
    assert!(host.in_flight().is_none());
    assert!(host.queue_snapshot().is_empty());
    let completions = host.with_looper(|looper| {
        looper
            .trace_events()
            .iter()
            .filter(|e| e.kind == TraceKind::Completed)
            .count()
    });
    assert_eq!(completions, 2);
}
