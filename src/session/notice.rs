//! One-shot messages carried from a form action to the next page view.

use serde::Serialize;

use crate::error::SynthError;

/// Inline message shown above the panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }
}

impl From<&SynthError> for Notice {
    fn from(err: &SynthError) -> Self {
        let level = match err {
            SynthError::BlankInput { .. } => NoticeLevel::Warning,
            SynthError::NotReady => NoticeLevel::Info,
            SynthError::Service(_) => NoticeLevel::Error,
        };
        Self {
            level,
            message: err.to_string(),
        }
    }
}
