//! Conversational assistant collaborator.
//!
//! The assistant has no bearing on scheduler correctness. Every failure
//! degrades to one of the fixed fallback answers below, so `ask` never
//! returns an error to the caller.

pub mod gemini;

use async_trait::async_trait;

pub use gemini::GeminiAssistant;

/// Answer when no API credential is configured.
pub const MISSING_KEY_ANSWER: &str =
    "[system] API key missing. Set API_KEY to talk to the camp guide.";
/// Answer when the request fails in transport or is rejected by the service.
pub const TRANSPORT_FAILURE_ANSWER: &str =
    "The wind is too loud... I couldn't hear you. (assistant unavailable)";
/// Answer when the service replies without any text.
pub const EMPTY_ANSWER: &str = "Just staring at the fire... (no response)";

/// Question-answering collaborator.
///
/// # Example
///
/// ```rust,ignore
/// use campfire_looper::assistant::{Assistant, GeminiAssistant};
/// use campfire_looper::config::AssistantConfig;
///
/// let guide = GeminiAssistant::new(AssistantConfig::from_env());
/// let answer = guide.ask("Why is the queue sorted by time?", "Message queue structure").await;
/// ```
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Answer `question` given the currently selected topic as `context`.
    async fn ask(&self, question: &str, context: &str) -> String;
}

/// Assistant that always gives the same answer. Useful offline and in tests.
#[derive(Debug, Clone)]
pub struct CannedAssistant {
    answer: String,
}

impl CannedAssistant {
    /// Answer every question with `answer`.
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }
}

#[async_trait]
impl Assistant for CannedAssistant {
    async fn ask(&self, _question: &str, _context: &str) -> String {
        self.answer.clone()
    }
}
