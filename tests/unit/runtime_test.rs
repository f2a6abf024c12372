//! Tests for tokio spawner utilities and snapshots

use campfire_looper::core::{Looper, SchedulerState};
use campfire_looper::runtime::{LooperSnapshot, Spawn, TokioSpawner};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_spawner_spawn() {
    let spawner = TokioSpawner::new(tokio::runtime::Handle::current());

    let (tx, rx) = tokio::sync::oneshot::channel();
    spawner.spawn(async move {
        tx.send(123).unwrap();
    });

    let result = rx.await.expect("oneshot result");
    assert_eq!(result, 123);
}

#[test]
fn test_snapshot_captures_looper() {
    let mut looper = Looper::with_defaults().with_thread_name("campsite");
    looper.prepare(0).unwrap();
    let item = looper.submit(3, 250, true, 10);

    let snapshot = LooperSnapshot::capture(&looper);
    assert_eq!(snapshot.session_id, looper.session_id());
    assert_eq!(snapshot.thread_name, "campsite");
    assert_eq!(snapshot.state, SchedulerState::Prepared);
    assert_eq!(snapshot.queue, vec![item]);
    assert_eq!(snapshot.pool.available, 4);
    assert_eq!(snapshot.pool.capacity, 10);
    assert!(snapshot.in_flight.is_none());
    assert_eq!(snapshot.trace.len(), 3);
}

#[test]
fn test_snapshot_json_shape() {
    let looper = Looper::with_defaults();
    let json = LooperSnapshot::from(&looper).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["state"], "uninitialized");
    assert_eq!(value["recycle"], "pooled_only");
    assert_eq!(value["pool"]["available"], 5);
    assert!(value["in_flight"].is_null());
    assert!(value["queue"].as_array().unwrap().is_empty());
}
