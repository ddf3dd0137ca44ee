//! Prompt text for the synthesiser.
//!
//! Holds the default per-panel prompts, the system role sent with every
//! completion, and the helpers that format the user message and the combined
//! final-synthesis input.
//!
//! # Usage
//!
//! ```
//! use brand_synth::prompts::{build_user_message, DEFAULT_CUSTOMER_PROMPT};
//!
//! let message = build_user_message(DEFAULT_CUSTOMER_PROMPT, "people want trust");
//! assert!(message.ends_with("Input:\npeople want trust"));
//! ```

use crate::session::{Category, PromptKey};

/// System role sent with every completion request.
pub const SYSTEM_ROLE: &str = "You are a brand strategist assistant.";

pub const DEFAULT_CUSTOMER_PROMPT: &str = "Summarise key desires and unmet needs.";

pub const DEFAULT_COMPETITION_PROMPT: &str =
    "What are the recurring brand messages across competitors?";

pub const DEFAULT_BRAND_PROMPT: &str = "Extract key brand values and positioning themes.";

pub const DEFAULT_FINAL_PROMPT: &str =
    "Synthesize the Customer, Competition and Brand insights into one cohesive brand strategy summary.";

/// Separator placed between the prompt and the user's notes.
pub const INPUT_SEPARATOR: &str = "\n\nInput:\n";

/// The editable prompt set of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    customer: String,
    competition: String,
    brand: String,
    final_synthesis: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            customer: DEFAULT_CUSTOMER_PROMPT.to_string(),
            competition: DEFAULT_COMPETITION_PROMPT.to_string(),
            brand: DEFAULT_BRAND_PROMPT.to_string(),
            final_synthesis: DEFAULT_FINAL_PROMPT.to_string(),
        }
    }
}

impl Prompts {
    pub fn get(&self, key: PromptKey) -> &str {
        match key {
            PromptKey::Category(Category::Customer) => &self.customer,
            PromptKey::Category(Category::Competition) => &self.competition,
            PromptKey::Category(Category::Brand) => &self.brand,
            PromptKey::Final => &self.final_synthesis,
        }
    }

    pub fn set(&mut self, key: PromptKey, text: String) {
        let slot = match key {
            PromptKey::Category(Category::Customer) => &mut self.customer,
            PromptKey::Category(Category::Competition) => &mut self.competition,
            PromptKey::Category(Category::Brand) => &mut self.brand,
            PromptKey::Final => &mut self.final_synthesis,
        };
        *slot = text;
    }
}

/// Format the user message for one completion: prompt, separator, notes.
pub fn build_user_message(prompt: &str, input_text: &str) -> String {
    format!("{}{}{}", prompt, INPUT_SEPARATOR, input_text)
}

/// Combine the latest synthesis of each category into the final-synthesis
/// input, labelled and in panel order.
///
/// `latest` yields `(category, text)` pairs; callers pass them in
/// [`Category::ALL`] order.
pub fn build_final_input<'a, I>(latest: I) -> String
where
    I: IntoIterator<Item = (Category, &'a str)>,
{
    latest
        .into_iter()
        .map(|(category, text)| format!("{} Insight:\n{}", category.label(), text))
        .collect::<Vec<_>>()
        .join("\n\n")
}
