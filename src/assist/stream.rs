use futures::StreamExt;
use tracing::debug;

use crate::assist::prompts;
use crate::assist::sources::SourceTracker;
use crate::assist::AssistEvent;
use crate::error::Result;
use crate::models::assist::ContextualSource;
use crate::provider::Provider;
use crate::streaming::{SplitEvent, SplitResult, StreamingJsonParser, TitleBodySplitter};

impl From<SplitEvent> for AssistEvent {
    fn from(event: SplitEvent) -> Self {
        match event {
            SplitEvent::Title(title) => AssistEvent::TitleUpdated(title),
            SplitEvent::Body(body) => AssistEvent::BodyUpdated(body),
        }
    }
}

/// Contextual web information for a task, with its citations
#[derive(Debug, Clone)]
pub struct ContextualInfo {
    pub text: String,
    pub sources: Vec<ContextualSource>,
}

/// Stream an improved title and description for rough task input.
///
/// Each absorbed fragment refreshes the title/body guess through
/// `on_event`; the finalized split is returned once the stream ends.
/// Notifications already delivered are never retracted on failure.
pub async fn enhance_task<F>(
    provider: &dyn Provider,
    temperature: f32,
    input: &str,
    mut on_event: F,
) -> Result<SplitResult>
where
    F: FnMut(AssistEvent),
{
    let request = prompts::enhance_request(input, temperature);
    let mut stream = provider.stream_generate_content(&request).await?;

    let mut parser = StreamingJsonParser::new();
    let mut splitter = TitleBodySplitter::new();

    while let Some(chunk) = stream.next().await {
        for response in parser.feed(&chunk?)? {
            for fragment in response.text_fragments() {
                for event in splitter.push(fragment) {
                    on_event(event.into());
                }
            }
        }
    }

    let (result, events) = splitter.finish();
    for event in events {
        on_event(event.into());
    }

    debug!(
        title_len = result.title.len(),
        body_len = result.body.len(),
        "Enhance stream finished"
    );
    Ok(result)
}

/// Stream sub-task suggestions, forwarding each fragment verbatim and
/// returning the full concatenation.
pub async fn suggest_subtasks<F>(
    provider: &dyn Provider,
    temperature: f32,
    title: &str,
    description: &str,
    mut on_event: F,
) -> Result<String>
where
    F: FnMut(AssistEvent),
{
    let request = prompts::subtasks_request(title, description, temperature);
    let mut stream = provider.stream_generate_content(&request).await?;

    let mut parser = StreamingJsonParser::new();
    let mut text = String::new();

    while let Some(chunk) = stream.next().await {
        for response in parser.feed(&chunk?)? {
            for fragment in response.text_fragments() {
                if fragment.is_empty() {
                    continue;
                }
                text.push_str(fragment);
                on_event(AssistEvent::Delta(fragment.to_string()));
            }
        }
    }

    Ok(text)
}

/// Stream grounded contextual information for a task.
///
/// Fragments are forwarded verbatim; the citation list is reported exactly
/// once after the stream ends, explicitly empty when nothing usable was
/// grounded. On a transport failure the citations observed so far are
/// still reported before the error propagates.
pub async fn fetch_contextual_info<F>(
    provider: &dyn Provider,
    temperature: f32,
    title: &str,
    description: &str,
    mut on_event: F,
) -> Result<ContextualInfo>
where
    F: FnMut(AssistEvent),
{
    let request = prompts::context_request(title, description, temperature);
    let mut stream = match provider.stream_generate_content(&request).await {
        Ok(stream) => stream,
        Err(e) => {
            on_event(AssistEvent::SourcesReady(Vec::new()));
            return Err(e);
        }
    };

    let mut parser = StreamingJsonParser::new();
    let mut tracker = SourceTracker::new();
    let mut text = String::new();

    while let Some(chunk) = stream.next().await {
        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(e) => {
                // Best-effort: report whatever was grounded before failing
                on_event(AssistEvent::SourcesReady(tracker.sources()));
                return Err(e);
            }
        };

        for response in parser.feed(&bytes)? {
            tracker.observe(&response);
            for fragment in response.text_fragments() {
                if fragment.is_empty() {
                    continue;
                }
                text.push_str(fragment);
                on_event(AssistEvent::Delta(fragment.to_string()));
            }
        }
    }

    let sources = tracker.sources();
    debug!(sources = sources.len(), "Contextual info stream finished");
    on_event(AssistEvent::SourcesReady(sources.clone()));

    Ok(ContextualInfo { text, sources })
}
