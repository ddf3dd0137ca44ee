//! HTML rendering of the four-panel form.
//!
//! The page is a single Tera template compiled once at startup. Rendering is
//! a pure read of the session: browsing past syntheses never mutates it.

use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

use crate::session::{Category, Notice, PromptKey, SessionState};

const INDEX_TEMPLATE: &str = include_str!("templates/index.html");

/// Shown on the final panel until every category has a synthesis.
pub const FINAL_PLACEHOLDER: &str =
    "All three sections must have at least one synthesis before generating final output.";

/// Which panel is open and which past synthesis each category shows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseQuery {
    pub tab: Option<String>,
    pub customer: Option<usize>,
    pub competition: Option<usize>,
    pub brand: Option<usize>,
}

impl BrowseQuery {
    /// Open `tab` with every category showing its latest synthesis.
    pub fn tab(tab: impl Into<String>) -> Self {
        Self {
            tab: Some(tab.into()),
            ..Self::default()
        }
    }

    fn index_for(&self, category: Category) -> Option<usize> {
        match category {
            Category::Customer => self.customer,
            Category::Competition => self.competition,
            Category::Brand => self.brand,
        }
    }

    fn active_tab(&self) -> &str {
        match self.tab.as_deref() {
            Some("final") => "final",
            Some(tab) => tab
                .parse::<Category>()
                .map(|c| c.slug())
                .unwrap_or(Category::Customer.slug()),
            None => Category::Customer.slug(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PanelView<'a> {
    slug: &'static str,
    label: &'static str,
    input: &'a str,
    prompt: &'a str,
    count: usize,
    indices: Vec<usize>,
    selected_index: Option<usize>,
    selected_text: Option<&'a str>,
    selected_at: Option<String>,
}

#[derive(Debug, Serialize)]
struct FinalView<'a> {
    prompt: &'a str,
    ready: bool,
    output: &'a str,
    placeholder: &'static str,
}

/// Compiled page templates.
pub struct View {
    tera: Tera,
}

impl View {
    /// Compile the templates.
    ///
    /// # Errors
    ///
    /// Returns a `tera::Error` if the embedded template fails to parse.
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template("index.html", INDEX_TEMPLATE)?;
        Ok(Self { tera })
    }

    /// Render the full page for a session.
    pub fn render_page(
        &self,
        state: &SessionState,
        browse: &BrowseQuery,
        notice: Option<&Notice>,
    ) -> Result<String, tera::Error> {
        let panels: Vec<PanelView<'_>> = Category::ALL
            .into_iter()
            .map(|category| panel_view(state, category, browse.index_for(category)))
            .collect();

        let final_panel = FinalView {
            prompt: state.prompt(PromptKey::Final),
            ready: state.all_categories_ready(),
            output: state.final_output(),
            placeholder: FINAL_PLACEHOLDER,
        };

        let mut context = Context::new();
        context.insert("active_tab", browse.active_tab());
        context.insert("panels", &panels);
        context.insert("final_panel", &final_panel);
        context.insert("notice", &notice);

        self.tera.render("index.html", &context)
    }
}

/// Resolve the browse selector for one category. A missing or out-of-range
/// index falls back to the latest synthesis.
fn panel_view(state: &SessionState, category: Category, requested: Option<usize>) -> PanelView<'_> {
    let count = state.outputs(category).len();
    let selected_index = match (count, requested) {
        (0, _) => None,
        (n, Some(i)) if i < n => Some(i),
        (n, _) => Some(n - 1),
    };
    let selected = selected_index.and_then(|i| state.output_at(category, i));

    PanelView {
        slug: category.slug(),
        label: category.label(),
        input: state.draft(category),
        prompt: state.prompt(category),
        count,
        indices: (0..count).collect(),
        selected_index,
        selected_text: selected.map(|s| s.text.as_str()),
        selected_at: selected.map(|s| s.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
    }
}
