//! Model-backed assist operations for tasks.
//!
//! Streaming operations notify progress through typed [`AssistEvent`]s and
//! return the finalized value; non-streaming operations parse and sanitize
//! the model's JSON before trusting it.

mod parse;
mod prompts;
mod sources;
mod stream;
mod tags;

pub use parse::{parse_task_input, strip_code_fence};
pub use sources::{SourceTracker, extract_contextual_sources};
pub use stream::{ContextualInfo, enhance_task, fetch_contextual_info, suggest_subtasks};
pub use tags::{normalize_tag, suggest_tags};

use crate::models::assist::ContextualSource;

/// Live notification from an assist streaming session.
///
/// Events arrive in session order: title/body refinements or verbatim
/// deltas while streaming, the citation list exactly once at the end of a
/// grounded session. Delivered events are provisional until the session
/// returns and are never retracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistEvent {
    TitleUpdated(String),
    BodyUpdated(String),
    Delta(String),
    SourcesReady(Vec<ContextualSource>),
}
