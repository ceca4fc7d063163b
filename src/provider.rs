use bytes::Bytes;
use futures::Stream;
use std::future::Future;
use std::pin::Pin;

use crate::error::Result;
use crate::models::gemini::{GeminiRequest, GeminiResponse};

/// Byte stream of a streaming generation response. Items carry the crate
/// error type so tests can inject transport failures.
pub type ProviderStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Future returned by the streaming call
pub type StreamFuture = Pin<Box<dyn Future<Output = Result<ProviderStream>> + Send>>;

/// Future returned by the non-streaming call
pub type ResponseFuture = Pin<Box<dyn Future<Output = Result<GeminiResponse>> + Send>>;

/// A model backend that can generate content, once or as a stream.
///
/// Assist operations and the HTTP layer only see this trait; the concrete
/// Gemini client lives in [`crate::client`].
pub trait Provider: Send + Sync {
    /// One-shot content generation
    fn generate_content(&self, request: &GeminiRequest) -> ResponseFuture;

    /// Streaming content generation; the returned bytes are Gemini's
    /// chunked JSON array, reassembled by the streaming parser
    fn stream_generate_content(&self, request: &GeminiRequest) -> StreamFuture;

    /// Provider name for logging
    fn name(&self) -> &str;
}
