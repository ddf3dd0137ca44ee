//! Single-shot completion: system role + prompt + notes in, trimmed text out.

use std::sync::Arc;

use super::chat::{GenerationRequest, LlmProvider, Message};
use crate::error::LlmError;
use crate::prompts::build_user_message;

/// Pass-through completion client. No retries, batching or caching.
#[derive(Clone)]
pub struct CompletionClient {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl CompletionClient {
    /// Wrap a provider. `model` is sent with every request; pass an empty
    /// string to let the provider pick its default.
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Run one completion and return the trimmed response text.
    ///
    /// # Errors
    ///
    /// Propagates the provider's `LlmError`, and returns
    /// `LlmError::EmptyResponse` when the model sends back no choices or only
    /// whitespace.
    pub async fn complete(
        &self,
        system_role: &str,
        prompt: &str,
        input_text: &str,
    ) -> Result<String, LlmError> {
        let request = GenerationRequest::new(
            self.model.clone(),
            vec![
                Message::system(system_role),
                Message::user(build_user_message(prompt, input_text)),
            ],
        );

        let response = self.provider.generate(request).await?;
        if let Some(usage) = response.usage {
            tracing::debug!(
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion finished"
            );
        }

        match response.first_content().map(str::trim) {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => Err(LlmError::EmptyResponse),
        }
    }
}
