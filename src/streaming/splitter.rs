/// Finalized outcome of a title/body split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResult {
    pub title: String,
    pub body: String,
}

/// Live notification emitted while a split session is running
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitEvent {
    /// Current best guess for the title
    Title(String),
    /// Current body text after the first newline
    Body(String),
}

/// Split a complete text into title and body.
///
/// The title is everything before the first newline, trimmed; the body is
/// everything after it, trimmed. Without a newline the whole trimmed text
/// is the title and the body is empty. Idempotent on the final text.
pub fn split_title_body(text: &str) -> SplitResult {
    match text.find('\n') {
        Some(idx) => SplitResult {
            title: text[..idx].trim().to_string(),
            body: text[idx + 1..].trim().to_string(),
        },
        None => SplitResult {
            title: text.trim().to_string(),
            body: String::new(),
        },
    }
}

/// Incremental title/body splitter for one streaming session.
///
/// Fragments are appended in arrival order. Until the first newline is
/// seen, every fragment refreshes the title guess (the full trimmed
/// accumulation). Once the newline is located the title is fixed and each
/// further fragment refreshes the body (untrimmed while streaming).
/// [`TitleBodySplitter::finish`] recomputes the split from the complete
/// accumulation with both halves trimmed and re-notifies both.
///
/// One splitter per session; state never outlives it.
#[derive(Debug, Default)]
pub struct TitleBodySplitter {
    accumulated: String,
    newline_at: Option<usize>,
}

impl TitleBodySplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb one fragment, returning the notifications it triggers.
    ///
    /// Empty fragments cannot change the split and produce nothing;
    /// whitespace-only fragments still count toward the newline search.
    pub fn push(&mut self, fragment: &str) -> Vec<SplitEvent> {
        if fragment.is_empty() {
            return Vec::new();
        }

        self.accumulated.push_str(fragment);

        let mut events = Vec::new();
        match self.newline_at {
            None => match self.accumulated.find('\n') {
                Some(idx) => {
                    self.newline_at = Some(idx);
                    events.push(SplitEvent::Title(
                        self.accumulated[..idx].trim().to_string(),
                    ));
                    events.push(SplitEvent::Body(self.accumulated[idx + 1..].to_string()));
                }
                None => {
                    events.push(SplitEvent::Title(self.accumulated.trim().to_string()));
                }
            },
            Some(idx) => {
                events.push(SplitEvent::Body(self.accumulated[idx + 1..].to_string()));
            }
        }
        events
    }

    /// Finalize the session: recompute the split from the complete
    /// accumulation with both halves trimmed, and re-notify both.
    pub fn finish(&self) -> (SplitResult, Vec<SplitEvent>) {
        let result = split_title_body(&self.accumulated);
        let events = vec![
            SplitEvent::Title(result.title.clone()),
            SplitEvent::Body(result.body.clone()),
        ];
        (result, events)
    }

    /// Full accumulated text so far
    pub fn accumulated(&self) -> &str {
        &self.accumulated
    }
}
