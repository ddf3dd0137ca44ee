//! The fixed set of note categories and the prompt keys built on them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three note-taking buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Customer,
    Competition,
    Brand,
}

impl Category {
    /// All categories in panel order. The final synthesis combines them in
    /// this order too.
    pub const ALL: [Category; 3] = [Category::Customer, Category::Competition, Category::Brand];

    /// Human-readable label, e.g. "Customer".
    pub fn label(&self) -> &'static str {
        match self {
            Category::Customer => "Customer",
            Category::Competition => "Competition",
            Category::Brand => "Brand",
        }
    }

    /// URL/form slug, e.g. "customer".
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Customer => "customer",
            Category::Competition => "competition",
            Category::Brand => "brand",
        }
    }

    /// Position of this category in [`Category::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Category::Customer => 0,
            Category::Competition => 1,
            Category::Brand => 2,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Category::Customer),
            "competition" => Ok(Category::Competition),
            "brand" => Ok(Category::Brand),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// Key of an editable prompt: one per category plus the final synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKey {
    Category(Category),
    Final,
}

impl From<Category> for PromptKey {
    fn from(category: Category) -> Self {
        PromptKey::Category(category)
    }
}
