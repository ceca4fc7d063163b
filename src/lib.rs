//! # Taskpilot
//!
//! An AI-assisted task management service backed by Google Gemini.
//!
//! ## Overview
//!
//! This library provides:
//! - **Task CRUD** over a concurrent store persisted to a JSON file
//! - **Assist operations** backed by Gemini:
//!   - parse free-text input into structured task fields
//!   - enhance a title/description (streamed, title/body split live)
//!   - suggest tags (normalized, memoized)
//!   - propose sub-tasks (streamed)
//!   - fetch grounded contextual web info with citations (streamed)
//! - **Streaming plumbing**: reassembly of Gemini's chunked JSON array
//!   stream and SSE generation for browser clients
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use taskpilot::config::AppConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load configuration from the environment
//! let config = AppConfig::from_env()?;
//! config.validate()?;
//!
//! // See src/main.rs for wiring the server together
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration loading and validation
//! - [`error`] - Error types and handling
//! - [`models`] - Task domain model and Gemini wire types
//! - [`assist`] - Model-backed assist operations
//! - [`streaming`] - Stream parser, title/body splitter, SSE generation
//! - [`store`] - Task persistence

pub mod assist;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod metrics;
pub mod models;
pub mod provider;
pub mod store;
pub mod streaming;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, Result};
