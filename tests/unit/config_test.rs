//! Tests for configuration validation

use campfire_looper::config::{AssistantConfig, LooperConfig, PoolConfig};
use campfire_looper::core::RecyclePolicy;

#[test]
fn test_looper_config_defaults_valid() {
    let cfg = LooperConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.thread_name, "main");
    assert_eq!(cfg.poll_interval_ms, 500);
    assert_eq!(cfg.processing_ms, 800);
    assert_eq!(cfg.pool.capacity, 10);
    assert_eq!(cfg.pool.initial_available, 5);
    assert_eq!(cfg.recycle, RecyclePolicy::PooledOnly);
}

#[test]
fn test_looper_config_invalid_poll_interval() {
    let invalid = LooperConfig {
        poll_interval_ms: 0,
        ..LooperConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_looper_config_invalid_processing() {
    let invalid = LooperConfig {
        processing_ms: 0,
        ..LooperConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_pool_config_initial_above_capacity() {
    let invalid = PoolConfig {
        capacity: 3,
        initial_available: 4,
    };
    let err = invalid.validate().unwrap_err();
    assert!(err.contains("initial_available"));

    let nested = LooperConfig {
        pool: invalid,
        ..LooperConfig::default()
    };
    assert!(nested.validate().unwrap_err().starts_with("pool invalid"));
}

#[test]
fn test_looper_config_from_json() {
    let cfg = LooperConfig::from_json_str(
        r#"{
            "thread_name": "campfire",
            "poll_interval_ms": 100,
            "processing_ms": 150,
            "pool": { "capacity": 4, "initial_available": 2 },
            "recycle": "pooled_only"
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.thread_name, "campfire");
    assert_eq!(cfg.limits().pool_capacity, 4);
    assert_eq!(cfg.limits().pool_initial, 2);
    assert_eq!(cfg.trace_capacity, 50);
}

#[test]
fn test_looper_config_from_json_rejects() {
    assert!(LooperConfig::from_json_str("not json").unwrap_err().starts_with("parse error"));
    assert!(LooperConfig::from_json_str(r#"{ "trace_capacity": 0 }"#).is_err());
}

#[test]
fn test_assistant_config_validation() {
    let cfg = AssistantConfig::default();
    assert!(cfg.validate().is_ok());
    assert!(cfg.api_key.is_none());

    let invalid = AssistantConfig {
        temperature: 3.5,
        ..AssistantConfig::default()
    };
    assert!(invalid.validate().is_err());

    assert!(AssistantConfig::default().with_timeout_secs(0).validate().is_err());
}

#[test]
fn test_assistant_config_never_serializes_key() {
    let cfg = AssistantConfig::default().with_api_key("secret-key");
    let json = serde_json::to_string(&cfg).unwrap();
    assert!(!json.contains("secret-key"));
    assert!(json.contains("gemini-2.5-flash"));
}
