//! Tests for builder modules

use std::sync::{Arc, Mutex};

use campfire_looper::builders::{build_looper, LooperBuilder};
use campfire_looper::catalog::Catalog;
use campfire_looper::config::LooperConfig;
use campfire_looper::core::{RecyclePolicy, SchedulerError, TickOutcome, WorkItem};
use campfire_looper::infra::SortedQueue;

#[test]
fn test_looper_builder_defaults() {
    let looper = build_looper(&LooperConfig::default()).unwrap();
    assert_eq!(looper.thread_name(), "main");
    assert_eq!(looper.pool_available(), 5);
    assert_eq!(looper.pool_capacity(), 10);
    assert_eq!(looper.recycle_policy(), RecyclePolicy::PooledOnly);
}

#[test]
fn test_looper_builder_rejects_invalid_config() {
    let config = LooperConfig {
        poll_interval_ms: 0,
        ..LooperConfig::default()
    };
    let err = LooperBuilder::new(config).build().err();
    assert!(matches!(err, Some(SchedulerError::InvalidConfig(_))));
}

#[test]
fn test_looper_builder_for_reuse_topic() {
    let mut catalog = Catalog::default();
    let topic = catalog.select("2.5.5").unwrap();

    let builder = LooperBuilder::new(LooperConfig::default()).for_topic(topic);
    assert_eq!(builder.config().recycle, RecyclePolicy::Always);
    assert_eq!(builder.build().unwrap().recycle_policy(), RecyclePolicy::Always);
}

#[test]
fn test_looper_builder_custom_queue_and_handler() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let config = LooperConfig {
        thread_name: "campsite".to_string(),
        ..LooperConfig::default()
    };
    let mut looper = LooperBuilder::with_queue(config, SortedQueue::new())
        .handler(move |item: &WorkItem| sink.lock().unwrap().push(item.kind))
        .build()
        .unwrap();

    looper.prepare(0).unwrap();
    looper.start(0).unwrap();
    looper.submit(11, 0, false, 0);
    assert!(matches!(looper.tick(500), TickOutcome::Dispatched(_)));
    assert_eq!(*seen.lock().unwrap(), vec![11]);
    assert_eq!(looper.thread_name(), "campsite");
}
