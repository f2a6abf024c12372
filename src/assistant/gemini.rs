//! Assistant backed by a generative-language REST endpoint.

use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{Assistant, EMPTY_ANSWER, MISSING_KEY_ANSWER, TRANSPORT_FAILURE_ANSWER};
use crate::config::AssistantConfig;
use crate::core::AppResult;

const PERSONA: &str = "You are a relaxed camper who is also an experienced systems engineer. \
Explain the handler / looper / message queue mechanism with camping metaphors: \
the looper is the camper tending the fire, the message queue is the pile of firewood \
waiting to burn in time order, a handler is whoever brings the wood, a message is one log, \
and the thread is the campsite. Keep answers short, warm, and technically accurate.";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// HTTP assistant using the `generateContent` call.
#[derive(Debug, Clone)]
pub struct GeminiAssistant {
    config: AssistantConfig,
    client: Client,
}

impl GeminiAssistant {
    /// Create an assistant from configuration.
    #[must_use]
    pub fn new(config: AssistantConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "falling back to default HTTP client");
                Client::new()
            });
        Self { config, client }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &AssistantConfig {
        &self.config
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn generate(&self, api_key: &str, question: &str, context: &str) -> AppResult<Option<String>> {
        let body = json!({
            "systemInstruction": {
                "parts": [{ "text": format!("{PERSONA}\n\nCurrent context: {context}") }]
            },
            "contents": [{ "role": "user", "parts": [{ "text": question }] }],
            "generationConfig": { "temperature": self.config.temperature }
        });

        let response = self
            .client
            .post(self.url())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .context("sending generateContent request")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("generateContent returned {status}"));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("decoding generateContent response")?;
        Ok(parsed.text())
    }
}

#[async_trait]
impl Assistant for GeminiAssistant {
    async fn ask(&self, question: &str, context: &str) -> String {
        let Some(api_key) = self.config.api_key.as_deref() else {
            debug!("assistant has no API key");
            return MISSING_KEY_ANSWER.to_string();
        };

        match self.generate(api_key, question, context).await {
            Ok(Some(text)) => text,
            Ok(None) => EMPTY_ANSWER.to_string(),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "assistant request failed");
                TRANSPORT_FAILURE_ANSWER.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_joins_parts() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Logs burn "},{"text":"in order."}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.text().as_deref(), Some("Logs burn in order."));
    }

    #[test]
    fn blank_response_has_no_text() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(parsed.text().is_none());
        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#).unwrap();
        assert!(parsed.text().is_none());
    }

    #[test]
    fn url_strips_trailing_slash() {
        let assistant = GeminiAssistant::new(AssistantConfig::default().with_endpoint("http://localhost:1/v1/"));
        assert_eq!(
            assistant.url(),
            "http://localhost:1/v1/models/gemini-2.5-flash:generateContent"
        );
    }
}
