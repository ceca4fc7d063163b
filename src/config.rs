use crate::error::{AppError, Result};
use serde::Deserialize;
use std::env;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub listen_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_endpoint() -> String {
    "generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_store_path() -> String {
    "tasks.json".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let listen_addr =
            env::var("TASKPILOT_LISTEN_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

        let api_key = env::var("GEMINI_API_KEY").unwrap_or_default();
        let endpoint = env::var("GEMINI_ENDPOINT").unwrap_or_else(|_| default_endpoint());
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| default_model());

        let temperature = match env::var("GEMINI_TEMPERATURE") {
            Ok(v) => v
                .parse::<f32>()
                .map_err(|e| AppError::ConfigError(format!("Invalid temperature: {}", e)))?,
            Err(_) => default_temperature(),
        };

        let store_path =
            env::var("TASKPILOT_STORE_PATH").unwrap_or_else(|_| default_store_path());

        Ok(AppConfig {
            server: ServerConfig { listen_addr },
            gemini: GeminiConfig {
                api_key,
                endpoint,
                model,
                temperature,
            },
            store: StoreConfig { path: store_path },
        })
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| AppError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let mut config: AppConfig = toml::from_str(&contents)
            .map_err(|e| AppError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        // Allow environment variables to override file config
        if let Ok(api_key) = env::var("GEMINI_API_KEY") {
            config.gemini.api_key = api_key;
        }

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.listen_addr.is_empty() {
            return Err(AppError::ConfigError("Listen address is empty".to_string()));
        }

        if self.gemini.endpoint.is_empty() {
            return Err(AppError::ConfigError("Endpoint is empty".to_string()));
        }

        if self.gemini.model.is_empty() {
            return Err(AppError::ConfigError("Model is empty".to_string()));
        }

        if !(0.0..=2.0).contains(&self.gemini.temperature) {
            return Err(AppError::ConfigError(format!(
                "Temperature {} outside 0.0..=2.0",
                self.gemini.temperature
            )));
        }

        if self.store.path.is_empty() {
            return Err(AppError::ConfigError("Store path is empty".to_string()));
        }

        Ok(())
    }
}
