//! LLM integration for brand-synth.
//!
//! [`ChatClient`] talks to an OpenAI-compatible chat-completions endpoint and
//! implements [`LlmProvider`]; [`CompletionClient`] sits on top of any provider
//! and turns (system role, prompt, notes) into a single trimmed answer.
//!
//! ```ignore
//! use brand_synth::llm::{ChatClient, CompletionClient};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let chat = ChatClient::new("https://api.openai.com/v1", Some(key), "gpt-4o", Duration::from_secs(120))?;
//! let client = CompletionClient::new(Arc::new(chat), "gpt-4o");
//! let text = client
//!     .complete("You are a brand strategist assistant.", "Summarise.", "people want trust")
//!     .await?;
//! ```

pub mod chat;
pub mod completion;

pub use chat::{
    ChatClient, Choice, GenerationRequest, GenerationResponse, LlmProvider, Message, Usage,
    DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};
pub use completion::CompletionClient;
