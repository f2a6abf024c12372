//! Looper configuration structures.

use serde::{Deserialize, Serialize};

use crate::core::{LooperLimits, RecyclePolicy, DEFAULT_TRACE_CAPACITY};

/// Item pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum free slots.
    pub capacity: usize,
    /// Free slots at startup.
    pub initial_available: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            initial_available: 5,
        }
    }
}

impl PoolConfig {
    /// Validate pool configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("capacity must be greater than 0".into());
        }
        if self.initial_available > self.capacity {
            return Err(format!(
                "initial_available ({}) must not exceed capacity ({})",
                self.initial_available, self.capacity
            ));
        }
        Ok(())
    }
}

/// Root looper configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LooperConfig {
    /// Informational name of the looper's thread.
    pub thread_name: String,
    /// Interval between dispatch ticks, in milliseconds.
    pub poll_interval_ms: u64,
    /// Fixed processing duration per item, in milliseconds.
    pub processing_ms: u64,
    /// Item pool sizing.
    pub pool: PoolConfig,
    /// Retained trace entries.
    pub trace_capacity: usize,
    /// Which completed items return to the pool.
    pub recycle: RecyclePolicy,
}

impl Default for LooperConfig {
    fn default() -> Self {
        Self {
            thread_name: "main".into(),
            poll_interval_ms: 500,
            processing_ms: 800,
            pool: PoolConfig::default(),
            trace_capacity: DEFAULT_TRACE_CAPACITY,
            recycle: RecyclePolicy::PooledOnly,
        }
    }
}

impl LooperConfig {
    /// Validate all values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be greater than 0".into());
        }
        if self.processing_ms == 0 {
            return Err("processing_ms must be greater than 0".into());
        }
        if self.trace_capacity == 0 {
            return Err("trace_capacity must be greater than 0".into());
        }
        self.pool.validate().map_err(|e| format!("pool invalid: {e}"))
    }

    /// Parse looper configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation message.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Timing and sizing handed to the looper.
    #[must_use]
    pub const fn limits(&self) -> LooperLimits {
        LooperLimits {
            poll_interval_ms: self.poll_interval_ms,
            processing_ms: self.processing_ms,
            pool_capacity: self.pool.capacity,
            pool_initial: self.pool.initial_available,
            trace_capacity: self.trace_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let cfg = LooperConfig::default();
        assert!(cfg.validate().is_ok());
        let limits = cfg.limits();
        assert_eq!(limits, LooperLimits::default());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = LooperConfig::from_json_str(r#"{ "poll_interval_ms": 20, "recycle": "always" }"#).unwrap();
        assert_eq!(cfg.poll_interval_ms, 20);
        assert_eq!(cfg.processing_ms, 800);
        assert_eq!(cfg.recycle, RecyclePolicy::Always);
        assert_eq!(cfg.pool.capacity, 10);
    }
}
