//! Unified error handling for the qinfang crate
//!
//! Attempt-level transport failures are deliberately NOT errors: the booking
//! client collapses them into classified message strings (see
//! [`crate::booking::outcome`]). The variants here cover everything that
//! should stop a run before it starts (bad config, bad requests, bad target
//! time) plus the fallible plumbing underneath.

use std::io;
use thiserror::Error;

/// Unified error type for the qinfang crate
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP client construction or transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML config parse errors
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors (missing/empty required fields, bad proxy string)
    #[error("Config error: {0}")]
    Config(String),

    /// A booking request that fails validation before any HTTP call
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A scheduling target that cannot be parsed or armed
    #[error("Scheduler error: {0}")]
    Scheduler(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a request validation error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a scheduler error
    pub fn scheduler(msg: impl Into<String>) -> Self {
        Self::Scheduler(msg.into())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
