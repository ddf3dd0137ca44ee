//! Error types for brand-synth operations.
//!
//! Defines the error types surfaced by the two moving parts of the app:
//! - LLM API interactions
//! - Synthesis generation (input gates plus service failures)

use thiserror::Error;

use crate::session::Category;

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse LLM response: {0}")]
    ParseError(String),

    #[error("LLM response contained no content")]
    EmptyResponse,

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({code}): {message}")]
    ApiError { code: u16, message: String },
}

/// Errors that can occur while generating a synthesis.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("Please provide input text before generating.")]
    BlankInput { category: Category },

    #[error("All three sections must have at least one synthesis before generating final output.")]
    NotReady,

    #[error("Synthesis service failed: {0}")]
    Service(#[from] LlmError),
}

impl SynthError {
    /// Whether this error is a user-input validation problem rather than a
    /// remote failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, SynthError::BlankInput { .. } | SynthError::NotReady)
    }
}
