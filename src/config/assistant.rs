//! Assistant collaborator configuration.

use std::env;

use serde::{Deserialize, Serialize};

/// Default generative model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Default REST endpoint base.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Settings for the remote text-generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// API credential; `None` makes every question degrade to a fallback.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model name.
    pub model: String,
    /// Endpoint base URL, without the `/models/...` suffix.
    pub endpoint: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            endpoint: DEFAULT_ENDPOINT.into(),
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

impl AssistantConfig {
    /// Load from the environment, reading a `.env` file first if present.
    ///
    /// Recognised variables: `API_KEY` (or `GEMINI_API_KEY`),
    /// `ASSISTANT_MODEL`, `ASSISTANT_ENDPOINT`.
    #[must_use]
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();
        Self {
            api_key: env::var("API_KEY")
                .or_else(|_| env::var("GEMINI_API_KEY"))
                .ok()
                .filter(|key| !key.trim().is_empty()),
            model: env::var("ASSISTANT_MODEL").unwrap_or(defaults.model),
            endpoint: env::var("ASSISTANT_ENDPOINT").unwrap_or(defaults.endpoint),
            ..defaults
        }
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the endpoint base URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Validate values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".into());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("temperature must be within 0.0..=2.0".into());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".into());
        }
        Ok(())
    }
}
