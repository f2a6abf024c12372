//! Tests for error types

use campfire_looper::core::SchedulerError;

#[test]
fn test_transition_error_messages() {
    assert_eq!(format!("{}", SchedulerError::AlreadyPrepared), "looper already prepared");
    assert_eq!(
        format!("{}", SchedulerError::NotPrepared),
        "looper not prepared; call prepare() first"
    );
    assert_eq!(format!("{}", SchedulerError::AlreadyRunning), "looper already running");
}

#[test]
fn test_invalid_config_error() {
    let err = SchedulerError::InvalidConfig("poll_interval_ms must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: poll_interval_ms must be greater than 0"
    );
    assert!(!err.is_transition());
}

#[test]
fn test_host_errors() {
    assert_eq!(format!("{}", SchedulerError::Disconnected), "looper owner disconnected");
    let err = SchedulerError::Spawn("out of threads".to_string());
    assert_eq!(format!("{}", err), "failed to spawn looper thread: out of threads");
}

#[test]
fn test_is_transition() {
    assert!(SchedulerError::AlreadyPrepared.is_transition());
    assert!(SchedulerError::NotPrepared.is_transition());
    assert!(SchedulerError::AlreadyRunning.is_transition());
    assert!(!SchedulerError::Disconnected.is_transition());
}
