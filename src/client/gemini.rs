use futures::TryStreamExt;
use reqwest::Client;
use tracing::{debug, info};

use crate::config::GeminiConfig;
use crate::error::{AppError, Result};
use crate::models::gemini::{GeminiRequest, GeminiResponse};
use crate::provider::{Provider, ProviderStream, ResponseFuture, StreamFuture};

#[derive(Debug)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Build a client. Fails before any network use if the API key is
    /// absent.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(AppError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn url(&self, verb: &str) -> String {
        format!(
            "https://{}/v1beta/models/{}:{}",
            self.config.endpoint, self.config.model, verb
        )
    }
}

impl Provider for GeminiClient {
    fn generate_content(&self, request: &GeminiRequest) -> ResponseFuture {
        let url = self.url("generateContent");
        let client = self.client.clone();
        let api_key = self.config.api_key.clone();
        let body = serde_json::to_vec(request);

        Box::pin(async move {
            let body = body?;
            debug!("Gemini: sending {} bytes to {}", body.len(), url);

            let response = client
                .post(&url)
                .header("Content-Type", "application/json")
                .header("x-goog-api-key", &api_key)
                .body(body)
                .send()
                .await
                .map_err(|e| AppError::UpstreamError(format!("Gemini request failed: {}", e)))?;

            let status = response.status();
            info!("Gemini responded with status: {}", status);

            if !status.is_success() {
                let error_body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(AppError::UpstreamError(format!(
                    "Gemini API error {}: {}",
                    status, error_body
                )));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| AppError::UpstreamError(format!("Gemini read failed: {}", e)))?;

            serde_json::from_slice::<GeminiResponse>(&bytes)
                .map_err(|e| AppError::MalformedResponse(format!("Gemini response: {}", e)))
        })
    }

    fn stream_generate_content(&self, request: &GeminiRequest) -> StreamFuture {
        let url = self.url("streamGenerateContent");
        let client = self.client.clone();
        let api_key = self.config.api_key.clone();
        let body = serde_json::to_vec(request);

        Box::pin(async move {
            let body = body?;
            debug!("Gemini: streaming {} bytes to {}", body.len(), url);

            let response = client
                .post(&url)
                .header("Content-Type", "application/json")
                .header("x-goog-api-key", &api_key)
                .body(body)
                .send()
                .await
                .map_err(|e| AppError::UpstreamError(format!("Gemini request failed: {}", e)))?;

            let status = response.status();
            info!("Gemini responded with status: {}", status);

            if !status.is_success() {
                let error_body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(AppError::UpstreamError(format!(
                    "Gemini API error {}: {}",
                    status, error_body
                )));
            }

            let stream = response
                .bytes_stream()
                .map_err(|e| AppError::UpstreamError(format!("Gemini stream failed: {}", e)));

            Ok(Box::pin(stream) as ProviderStream)
        })
    }

    fn name(&self) -> &str {
        "Gemini"
    }
}
