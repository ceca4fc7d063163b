use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing Gemini API key: set GEMINI_API_KEY or [gemini].api_key")]
    MissingApiKey,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Task not found: {0}")]
    TaskNotFound(uuid::Uuid),

    #[error("Upstream error: {0}")]
    UpstreamError(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVarError(#[from] std::env::VarError),
}

pub type Result<T> = std::result::Result<T, AppError>;
