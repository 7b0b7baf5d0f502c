//! External service port traits (text generation).

use async_trait::async_trait;

use super::error::LlmError;

// =============================================================================
// LLM Types
// =============================================================================

/// A single-prompt generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    /// The full prompt, sent as one user message
    pub prompt: String,
    /// Temperature for response generation (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

impl LlmRequest {
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            prompt: text.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn prompt_text(&self) -> &str {
        &self.prompt
    }
}

/// Response from the LLM
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// The generated text content
    pub content: String,
    /// Why generation stopped
    pub finish_reason: FinishReason,
}

impl LlmResponse {
    /// A plain stop-terminated response, mostly for stubs.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            finish_reason: FinishReason::Stop,
        }
    }

    pub fn with_finish_reason(mut self, finish_reason: FinishReason) -> Self {
        self.finish_reason = finish_reason;
        self
    }
}

/// Reason the generation finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    /// Cut off at the token limit; the text is usable but incomplete.
    Length,
    Other,
}

/// The text-generation collaborator: prompt in, text out, or failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmPort: Send + Sync {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;
}
