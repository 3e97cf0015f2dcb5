//! Text-generation backend abstraction.
//!
//! Provides a unified interface over LLM providers. The engine consumes
//! this interface in exactly one place (the conversion orchestrator) and
//! never trusts generated output without re-validating it.

use crate::error::LlmError;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A request to the text-generation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmRequest {
    /// The prompt to send.
    pub prompt: String,
    /// Temperature for sampling (0.0 - 1.0).
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
}

impl LlmRequest {
    /// Creates a new request with just a prompt.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Sets the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the max tokens.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A response from the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    /// The generated free-form text.
    pub content: String,
    /// Model that generated the response.
    pub model: String,
}

/// One event in a streamed generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LlmStreamEvent {
    /// A partial-content chunk.
    Content { delta: String },
    /// The model requested a tool invocation.
    ToolCall { name: String, arguments: JsonValue },
    /// Generation failed.
    Error { message: String },
    /// Generation finished.
    Done,
}

/// Trait for text-generation backends.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generates a response for the given request.
    ///
    /// # Errors
    ///
    /// Returns an error if the collaborator call fails.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Streams a generation as an ordered sequence of events.
    ///
    /// The default implementation runs a single-shot generation and emits
    /// it as one content chunk followed by `Done` (or a single `Error`).
    async fn generate_stream(&self, request: &LlmRequest) -> BoxStream<'static, LlmStreamEvent> {
        let events = match self.generate(request).await {
            Ok(response) => vec![
                LlmStreamEvent::Content {
                    delta: response.content,
                },
                LlmStreamEvent::Done,
            ],
            Err(err) => vec![LlmStreamEvent::Error {
                message: err.to_string(),
            }],
        };
        stream::iter(events).boxed()
    }

    /// Returns the model name.
    fn model(&self) -> &str;
}
