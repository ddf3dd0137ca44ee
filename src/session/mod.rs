//! Session state for the synthesiser form.
//!
//! A session owns the per-category synthesis history, the editable prompts
//! and the final synthesis. State lives only in memory and disappears when
//! the session expires or the process exits.

pub mod category;
pub mod notice;
pub mod state;
pub mod store;

pub use category::{Category, PromptKey, UnknownCategory};
pub use notice::{Notice, NoticeLevel};
pub use state::{SessionState, Synthesis};
pub use store::{SessionId, SessionStore, SharedSession};
