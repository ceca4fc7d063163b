use bytes::Bytes;
use futures::stream;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use taskpilot::error::{AppError, Result};
use taskpilot::models::gemini::{GeminiRequest, GeminiResponse};
use taskpilot::provider::{Provider, ProviderStream, ResponseFuture, StreamFuture};

/// One scripted item of a mock streaming response
#[derive(Clone)]
pub enum MockItem {
    /// Raw bytes delivered as one transport chunk
    Data(String),
    /// Transport failure surfaced mid-stream
    Fail(String),
}

/// Provider that replays a canned script instead of calling Gemini
pub struct MockProvider {
    pub stream_script: Vec<MockItem>,
    pub response_json: Option<String>,
    pub calls: Arc<AtomicUsize>,
}

impl MockProvider {
    pub fn streaming(script: Vec<MockItem>) -> Self {
        Self {
            stream_script: script,
            response_json: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn oneshot(response_json: impl Into<String>) -> Self {
        Self {
            stream_script: Vec::new(),
            response_json: Some(response_json.into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Provider for MockProvider {
    fn generate_content(&self, _request: &GeminiRequest) -> ResponseFuture {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let json = self.response_json.clone();
        Box::pin(async move {
            let json =
                json.ok_or_else(|| AppError::UpstreamError("no scripted response".to_string()))?;
            serde_json::from_str::<GeminiResponse>(&json)
                .map_err(|e| AppError::MalformedResponse(e.to_string()))
        })
    }

    fn stream_generate_content(&self, _request: &GeminiRequest) -> StreamFuture {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let items: Vec<Result<Bytes>> = self
            .stream_script
            .iter()
            .map(|item| match item {
                MockItem::Data(s) => Ok(Bytes::from(s.clone())),
                MockItem::Fail(msg) => Err(AppError::UpstreamError(msg.clone())),
            })
            .collect();
        Box::pin(async move { Ok(Box::pin(stream::iter(items)) as ProviderStream) })
    }

    fn name(&self) -> &str {
        "Mock"
    }
}

/// A streamed response object carrying one text fragment
pub fn text_object(text: &str) -> String {
    format!(
        r#"{{"candidates":[{{"content":{{"parts":[{{"text":{}}}],"role":"model"}}}}]}}"#,
        serde_json::to_string(text).unwrap()
    )
}

/// A Gemini-style streaming body: a JSON array of response objects
pub fn stream_array(objects: &[String]) -> String {
    format!("[{}]", objects.join(","))
}

/// A non-streaming response whose whole text is `text`
pub fn oneshot_response(text: &str) -> String {
    text_object(text)
}
