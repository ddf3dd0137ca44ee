//! brand-synth: brand strategy synthesiser.
//!
//! A small web form that turns free-text Customer, Competition and Brand notes
//! into LLM syntheses, then combines the latest of each into a final brand
//! strategy summary. All state is per browser session and in memory only.

pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod metrics;
pub mod prompts;
pub mod session;
pub mod synth;
pub mod web;

pub use error::{LlmError, SynthError};
