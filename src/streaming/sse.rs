use serde_json::json;

use crate::assist::AssistEvent;

/// SSE framing for assist notifications.
///
/// Streaming assist endpoints forward splitter/collector notifications to
/// the browser as named events; the terminal event is `done` on success or
/// `error` on failure.
pub fn format_event(event: &str, data: &serde_json::Value) -> String {
    format!("event: {}\ndata: {}\n\n", event, data)
}

pub fn assist_event(event: &AssistEvent) -> String {
    match event {
        AssistEvent::TitleUpdated(title) => format_event("title", &json!({ "title": title })),
        AssistEvent::BodyUpdated(body) => format_event("body", &json!({ "body": body })),
        AssistEvent::Delta(text) => format_event("delta", &json!({ "text": text })),
        AssistEvent::SourcesReady(sources) => {
            format_event("sources", &json!({ "sources": sources }))
        }
    }
}

pub fn done_event(data: &serde_json::Value) -> String {
    format_event("done", data)
}

/// Format error as SSE event
pub fn format_error(error_type: &str, message: &str) -> String {
    let data = json!({
        "type": error_type,
        "message": message
    });
    format_event("error", &data)
}
