//! Synthesis controller.
//!
//! Applies the two gates of the form (blank input per category, readiness of
//! the final panel), calls the completion client and records successful
//! results into the session. Failed calls leave outputs untouched.

use std::time::Instant;

use tracing::{info, warn};

use crate::error::SynthError;
use crate::llm::CompletionClient;
use crate::metrics;
use crate::prompts::build_final_input;
use crate::session::{Category, PromptKey, SessionState};

/// Drives category and final syntheses for a session.
#[derive(Clone)]
pub struct Synthesiser {
    client: CompletionClient,
    system_role: String,
}

impl Synthesiser {
    pub fn new(client: CompletionClient, system_role: impl Into<String>) -> Self {
        Self {
            client,
            system_role: system_role.into(),
        }
    }

    /// Generate a synthesis for one category and append it to the session.
    ///
    /// The submitted input, and the prompt when one was submitted, are
    /// remembered in the session whatever the outcome. A missing prompt keeps
    /// the session's current one.
    ///
    /// # Errors
    ///
    /// - `SynthError::BlankInput` when `input` is empty after trimming; no
    ///   call is made.
    /// - `SynthError::Service` when the completion fails; nothing is recorded.
    pub async fn generate_category(
        &self,
        state: &mut SessionState,
        category: Category,
        input: &str,
        prompt: Option<&str>,
    ) -> Result<String, SynthError> {
        if let Some(prompt) = prompt {
            state.set_prompt(category, prompt);
        }
        state.set_draft(category, input);

        if input.trim().is_empty() {
            warn!(category = %category, "Generate requested with blank input");
            return Err(SynthError::BlankInput { category });
        }

        let prompt = state.prompt(category).to_string();
        let text = self.run(category.slug(), &prompt, input).await?;
        state.record_output(category, text.clone());
        let index = state.outputs(category).len() - 1;
        info!(category = %category, index, chars = text.len(), "Recorded synthesis");
        Ok(text)
    }

    /// Generate the final synthesis from the latest output of each category.
    /// A missing prompt keeps the session's current final prompt.
    ///
    /// # Errors
    ///
    /// - `SynthError::NotReady` when any category has no synthesis yet; no
    ///   call is made.
    /// - `SynthError::Service` when the completion fails; the previous final
    ///   output is kept.
    pub async fn generate_final(
        &self,
        state: &mut SessionState,
        prompt: Option<&str>,
    ) -> Result<String, SynthError> {
        if let Some(prompt) = prompt {
            state.set_prompt(PromptKey::Final, prompt);
        }

        let Some(combined) = combined_latest(state) else {
            warn!(missing = ?state.missing_categories(), "Final synthesis requested before all sections are ready");
            return Err(SynthError::NotReady);
        };

        let prompt = state.prompt(PromptKey::Final).to_string();
        let text = self.run("final", &prompt, &combined).await?;
        state.set_final_output(text.clone());
        info!(chars = text.len(), "Recorded final synthesis");
        Ok(text)
    }

    async fn run(&self, panel: &str, prompt: &str, input: &str) -> Result<String, SynthError> {
        let started = Instant::now();
        let result = self
            .client
            .complete(&self.system_role, prompt, input)
            .await;
        let elapsed = started.elapsed().as_secs_f64();
        metrics::record_llm_request(panel, result.is_ok(), elapsed);

        match result {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(panel, error = %e, "Completion failed");
                Err(e.into())
            }
        }
    }
}

/// The final-synthesis input built from the latest synthesis of every
/// category, or `None` while any category is still empty.
pub fn combined_latest(state: &SessionState) -> Option<String> {
    let latest = Category::ALL
        .into_iter()
        .map(|category| {
            state
                .latest(category)
                .map(|synthesis| (category, synthesis.text.as_str()))
        })
        .collect::<Option<Vec<_>>>()?;
    Some(build_final_input(latest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::llm::{Choice, GenerationRequest, GenerationResponse, LlmProvider, Message};
    use crate::prompts::{Prompts, DEFAULT_CUSTOMER_PROMPT, DEFAULT_FINAL_PROMPT, SYSTEM_ROLE};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Mock LLM provider replaying scripted outcomes and recording requests.
    struct MockLlmProvider {
        replies: Mutex<VecDeque<Result<String, LlmError>>>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl MockLlmProvider {
        fn new(replies: Vec<Result<String, LlmError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.requests.lock().expect("lock not poisoned").len()
        }

        fn last_user_message(&self) -> String {
            let requests = self.requests.lock().expect("lock not poisoned");
            requests
                .last()
                .and_then(|r| r.messages.last())
                .map(|m| m.content.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn generate(
            &self,
            request: GenerationRequest,
        ) -> Result<GenerationResponse, LlmError> {
            self.requests
                .lock()
                .expect("lock not poisoned")
                .push(request);
            let reply = self
                .replies
                .lock()
                .expect("lock not poisoned")
                .pop_front()
                .unwrap_or_else(|| Ok("default reply".to_string()))?;
            Ok(GenerationResponse {
                model: "mock-model".to_string(),
                choices: vec![Choice {
                    index: 0,
                    message: Message::assistant(reply),
                    finish_reason: Some("stop".to_string()),
                }],
                usage: None,
            })
        }
    }

    fn synthesiser(provider: Arc<MockLlmProvider>) -> Synthesiser {
        Synthesiser::new(CompletionClient::new(provider, "mock-model"), SYSTEM_ROLE)
    }

    fn ready_state() -> SessionState {
        let mut state = SessionState::new(Prompts::default());
        state.record_output(Category::Customer, "old customer");
        state.record_output(Category::Customer, "new customer");
        state.record_output(Category::Competition, "competition");
        state.record_output(Category::Brand, "brand");
        state
    }

    #[tokio::test]
    async fn test_generate_category_appends_once() {
        let provider = Arc::new(MockLlmProvider::new(vec![Ok(" Trust is key. ".to_string())]));
        let synth = synthesiser(provider.clone());
        let mut state = SessionState::new(Prompts::default());

        let text = synth
            .generate_category(
                &mut state,
                Category::Customer,
                "people want trust",
                Some(DEFAULT_CUSTOMER_PROMPT),
            )
            .await
            .expect("generation succeeds");

        assert_eq!(text, "Trust is key.");
        assert_eq!(state.outputs(Category::Customer).len(), 1);
        assert_eq!(
            state.latest(Category::Customer).map(|s| s.text.as_str()),
            Some("Trust is key.")
        );
        assert_eq!(provider.calls(), 1);
        assert_eq!(
            provider.last_user_message(),
            "Summarise key desires and unmet needs.\n\nInput:\npeople want trust"
        );
    }

    #[tokio::test]
    async fn test_blank_input_makes_no_call() {
        let provider = Arc::new(MockLlmProvider::new(vec![]));
        let synth = synthesiser(provider.clone());
        let mut state = SessionState::new(Prompts::default());

        for input in ["", "   \n\t "] {
            let err = synth
                .generate_category(&mut state, Category::Brand, input, Some("prompt"))
                .await
                .unwrap_err();
            assert!(matches!(err, SynthError::BlankInput { category: Category::Brand }));
        }

        assert!(state.outputs(Category::Brand).is_empty());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_service_failure_records_nothing() {
        let provider = Arc::new(MockLlmProvider::new(vec![Err(LlmError::ApiError {
            code: 503,
            message: "unavailable".to_string(),
        })]));
        let synth = synthesiser(provider);
        let mut state = SessionState::new(Prompts::default());

        let err = synth
            .generate_category(&mut state, Category::Competition, "notes", Some("Edited prompt"))
            .await
            .unwrap_err();

        assert!(matches!(err, SynthError::Service(LlmError::ApiError { code: 503, .. })));
        assert!(state.outputs(Category::Competition).is_empty());
        assert_eq!(state.prompt(Category::Competition), "Edited prompt");
        assert_eq!(state.draft(Category::Competition), "notes");
    }

    #[tokio::test]
    async fn test_final_requires_all_categories() {
        let provider = Arc::new(MockLlmProvider::new(vec![]));
        let synth = synthesiser(provider.clone());
        let mut state = SessionState::new(Prompts::default());
        state.record_output(Category::Customer, "c");
        state.record_output(Category::Brand, "b");

        let err = synth
            .generate_final(&mut state, Some("Combine."))
            .await
            .unwrap_err();
        assert!(matches!(err, SynthError::NotReady));
        assert_eq!(state.final_output(), "");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_final_uses_latest_entries_in_order() {
        let provider = Arc::new(MockLlmProvider::new(vec![Ok("Strategy.".to_string())]));
        let synth = synthesiser(provider.clone());
        let mut state = ready_state();

        let text = synth
            .generate_final(&mut state, Some("Combine."))
            .await
            .expect("final succeeds");

        assert_eq!(text, "Strategy.");
        assert_eq!(state.final_output(), "Strategy.");
        assert_eq!(
            provider.last_user_message(),
            "Combine.\n\nInput:\n\
             Customer Insight:\nnew customer\n\n\
             Competition Insight:\ncompetition\n\n\
             Brand Insight:\nbrand"
        );
    }

    #[tokio::test]
    async fn test_final_overwrites_and_survives_failure() {
        let provider = Arc::new(MockLlmProvider::new(vec![
            Ok("first".to_string()),
            Ok("second".to_string()),
            Err(LlmError::RequestFailed("timeout".to_string())),
        ]));
        let synth = synthesiser(provider);
        let mut state = ready_state();

        synth.generate_final(&mut state, Some("p")).await.expect("first");
        synth.generate_final(&mut state, Some("p")).await.expect("second");
        assert_eq!(state.final_output(), "second");

        assert!(synth.generate_final(&mut state, Some("p")).await.is_err());
        assert_eq!(state.final_output(), "second");
    }

    #[tokio::test]
    async fn test_missing_prompt_keeps_session_prompt() {
        let provider = Arc::new(MockLlmProvider::new(vec![
            Ok("one".to_string()),
            Ok("two".to_string()),
            Ok("final".to_string()),
        ]));
        let synth = synthesiser(provider.clone());
        let mut state = ready_state();

        synth
            .generate_category(&mut state, Category::Customer, "notes", None)
            .await
            .expect("default prompt used");
        assert_eq!(state.prompt(Category::Customer), DEFAULT_CUSTOMER_PROMPT);
        assert_eq!(
            provider.last_user_message(),
            format!("{}\n\nInput:\nnotes", DEFAULT_CUSTOMER_PROMPT)
        );

        state.set_prompt(Category::Brand, "Name the archetype.");
        synth
            .generate_category(&mut state, Category::Brand, "more notes", None)
            .await
            .expect("edited prompt kept");
        assert_eq!(state.prompt(Category::Brand), "Name the archetype.");
        assert!(provider.last_user_message().starts_with("Name the archetype.\n\n"));

        synth
            .generate_final(&mut state, None)
            .await
            .expect("default final prompt used");
        assert_eq!(state.prompt(PromptKey::Final), DEFAULT_FINAL_PROMPT);
        assert!(provider.last_user_message().starts_with(DEFAULT_FINAL_PROMPT));
    }

    #[test]
    fn test_combined_latest_none_until_ready() {
        let mut state = SessionState::new(Prompts::default());
        assert!(combined_latest(&state).is_none());
        state.record_output(Category::Customer, "c");
        state.record_output(Category::Competition, "x");
        assert!(combined_latest(&state).is_none());
        state.record_output(Category::Brand, "b");
        assert!(combined_latest(&state).is_some());
    }
}
