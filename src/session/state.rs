//! Per-session interaction record.
//!
//! Holds, per category, the append-only list of generated syntheses, the
//! editable prompts and the single final synthesis. Nothing here talks to the
//! network; [`crate::synth::Synthesiser`] decides when to mutate it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::category::{Category, PromptKey};
use super::notice::Notice;
use crate::prompts::Prompts;

/// One generated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Synthesis {
    /// Trimmed text returned by the model.
    pub text: String,
    /// When the text was recorded.
    pub created_at: DateTime<Utc>,
}

impl Synthesis {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// Session-lifetime state behind the form.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Indexed by [`Category::index`].
    outputs: [Vec<Synthesis>; 3],
    /// Last submitted input text per category.
    drafts: [String; 3],
    prompts: Prompts,
    final_output: String,
    /// Message for the next page view, cleared once shown.
    flash: Option<Notice>,
}

impl SessionState {
    /// Create a fresh session seeded with the given prompts.
    pub fn new(prompts: Prompts) -> Self {
        Self {
            prompts,
            ..Self::default()
        }
    }

    /// Append a generated text to a category's history.
    pub fn record_output(&mut self, category: Category, text: impl Into<String>) -> &Synthesis {
        let list = &mut self.outputs[category.index()];
        list.push(Synthesis::new(text));
        &list[list.len() - 1]
    }

    /// Overwrite the prompt stored under `key`.
    pub fn set_prompt(&mut self, key: impl Into<PromptKey>, text: impl Into<String>) {
        self.prompts.set(key.into(), text.into());
    }

    pub fn prompt(&self, key: impl Into<PromptKey>) -> &str {
        self.prompts.get(key.into())
    }

    /// Most recent synthesis for a category, if any.
    pub fn latest(&self, category: Category) -> Option<&Synthesis> {
        self.outputs[category.index()].last()
    }

    /// Synthesis at `index` in generation order.
    pub fn output_at(&self, category: Category, index: usize) -> Option<&Synthesis> {
        self.outputs[category.index()].get(index)
    }

    pub fn outputs(&self, category: Category) -> &[Synthesis] {
        &self.outputs[category.index()]
    }

    /// True iff every category has at least one synthesis.
    pub fn all_categories_ready(&self) -> bool {
        self.outputs.iter().all(|list| !list.is_empty())
    }

    /// Categories that still have no synthesis, in panel order.
    pub fn missing_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.outputs[c.index()].is_empty())
            .collect()
    }

    pub fn final_output(&self) -> &str {
        &self.final_output
    }

    /// Replace the final synthesis. No history is kept.
    pub fn set_final_output(&mut self, text: impl Into<String>) {
        self.final_output = text.into();
    }

    pub fn draft(&self, category: Category) -> &str {
        &self.drafts[category.index()]
    }

    pub fn set_draft(&mut self, category: Category, text: impl Into<String>) {
        self.drafts[category.index()] = text.into();
    }

    /// Queue a notice for the next page view, replacing any unread one.
    pub fn set_flash(&mut self, notice: Notice) {
        self.flash = Some(notice);
    }

    /// Take the queued notice, if any. A second call returns `None`.
    pub fn take_flash(&mut self) -> Option<Notice> {
        self.flash.take()
    }
}
