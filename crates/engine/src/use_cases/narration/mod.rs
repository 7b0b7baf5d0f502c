//! Narration client - turns structured requests into prompts for the LLM.
//!
//! The client never fails: a generation error comes back as
//! [`Narration::Fallback`] carrying the reason and a placeholder text that is
//! safe to persist.

use std::sync::Arc;

use taleturn_domain::{ActionDescription, DiceRoll, OutcomeTier, SessionSetup};

use crate::infrastructure::ports::{FinishReason, LlmPort, LlmRequest};

pub mod prompts;

/// Result of a narration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Narration {
    /// The collaborator produced usable text.
    Generated(String),
    /// Generation failed; `text` is the placeholder that stands in for it.
    Fallback { reason: String, text: String },
}

impl Narration {
    pub fn fallback(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let text = format!("[The narrator is silent: {}]", reason);
        Self::Fallback { reason, text }
    }

    /// The text to show and persist, generated or not.
    pub fn into_text(self) -> String {
        match self {
            Self::Generated(text) => text,
            Self::Fallback { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

pub struct NarrationClient {
    llm: Arc<dyn LlmPort>,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl NarrationClient {
    pub fn new(llm: Arc<dyn LlmPort>, temperature: f32, max_tokens: Option<u32>) -> Self {
        Self {
            llm,
            temperature,
            max_tokens,
        }
    }

    /// Ask for the 2-3 paragraph opening of a new adventure.
    pub async fn request_opening_scenario(&self, setup: &SessionSetup) -> Narration {
        let prompt = prompts::render(
            prompts::OPENING_SCENARIO,
            &[
                ("theme", setup.theme.as_str()),
                ("difficulty", setup.difficulty.as_str()),
                ("player_class", setup.player_class.as_str()),
            ],
        );
        self.generate("opening_scenario", prompt).await
    }

    /// Ask for the consequence of one turn, given everything that came before.
    pub async fn request_turn_narration(
        &self,
        full_context: &str,
        action: &ActionDescription,
        roll: &DiceRoll,
        outcome: OutcomeTier,
    ) -> Narration {
        let dice_result = roll.result().to_string();
        let outcome = outcome.to_string();
        let prompt = prompts::render(
            prompts::TURN_NARRATION,
            &[
                ("full_context", full_context),
                ("player_action", action.as_str()),
                ("dice_result", &dice_result),
                ("dice_type", roll.dice_type().as_str()),
                ("outcome", &outcome),
            ],
        );
        self.generate("turn_narration", prompt).await
    }

    async fn generate(&self, kind: &'static str, prompt: String) -> Narration {
        let request = LlmRequest::prompt(prompt)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        match self.llm.generate(request).await {
            Ok(response) if !response.content.trim().is_empty() => {
                if response.finish_reason == FinishReason::Length {
                    tracing::warn!(
                        kind,
                        max_tokens = ?self.max_tokens,
                        "Narration cut off at the token limit"
                    );
                }
                tracing::debug!(kind, chars = response.content.len(), "Narration generated");
                Narration::Generated(response.content)
            }
            Ok(_) => {
                tracing::warn!(kind, "Narration response had no content");
                Narration::fallback("the response contained no text")
            }
            Err(e) => {
                tracing::warn!(kind, error = %e, "Narration request failed");
                Narration::fallback(e.to_string())
            }
        }
    }
}
