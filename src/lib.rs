//! Post-Harvester: collects social-media post links from chat history
//!
//! This crate walks the message history of a Discord channel, extracts links to
//! X/Twitter posts, filters them by author role and link rules, enriches every
//! unique post with metadata from SocialData, and writes one ordered JSON file.

pub mod config;
pub mod discord;
pub mod enrich;
pub mod http;
pub mod output;
pub mod pipeline;
pub mod retry;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Post-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Message source error: {0}")]
    Source(#[from] ApiError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Invalid walk state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::WalkState,
        to: state::WalkState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0} is missing or still set to a placeholder value")]
    Placeholder(String),
}

/// Errors returned by the remote APIs after the retry policy has run its course
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP {status} from {url}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("Server error {status} from {url}: {body}")]
    Server { url: String, status: u16, body: String },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected response body from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Result type alias for Post-Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for remote API calls
pub type ApiResult<T> = std::result::Result<T, ApiError>;

// Re-export commonly used types
pub use config::Config;
pub use state::WalkState;
pub use crate::url::{canonicalize_url, extract_post_references, ExclusionRules, PostReference};
