use crate::models::assist::ContextualSource;
use crate::models::gemini::{GeminiResponse, GroundingMetadata};

/// Per-session tracker for grounding metadata.
///
/// Citation metadata tends to arrive only on the terminal or near-terminal
/// streamed object, and later objects carry cumulative supersets of
/// earlier ones, so the tracker keeps the most recent metadata observed.
/// One tracker per streaming session, owned by the consume loop.
#[derive(Debug, Default)]
pub struct SourceTracker {
    latest: Option<GroundingMetadata>,
}

impl SourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one streamed response object. A response without grounding
    /// metadata leaves previously observed citations intact.
    pub fn observe(&mut self, response: &GeminiResponse) {
        if let Some(meta) = response.grounding_metadata() {
            self.latest = Some(meta.clone());
        }
    }

    /// Extract the web sources retained so far. Empty when nothing usable
    /// was observed.
    pub fn sources(&self) -> Vec<ContextualSource> {
        extract_contextual_sources(self.latest.as_ref())
    }
}

/// Filter grounding chunks down to well-formed web citations.
///
/// A chunk is kept only if it carries a web reference with a non-empty
/// HTTP(S) uri; a missing title falls back to the uri for display.
pub fn extract_contextual_sources(meta: Option<&GroundingMetadata>) -> Vec<ContextualSource> {
    let Some(meta) = meta else {
        return Vec::new();
    };

    meta.grounding_chunks
        .iter()
        .filter_map(|chunk| {
            let web = chunk.web.as_ref()?;
            let uri = web.uri.as_deref()?;
            if uri.is_empty() || !(uri.starts_with("http://") || uri.starts_with("https://")) {
                return None;
            }
            let title = web
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| uri.to_string());
            Some(ContextualSource {
                uri: uri.to_string(),
                title,
            })
        })
        .collect()
}
