//! Shared HTTP plumbing for both API clients

use crate::config::HttpConfig;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// User agent sent to both APIs
const USER_AGENT: &str = concat!("post-harvester/", env!("CARGO_PKG_VERSION"));

/// A response whose body has been read and, if possible, decoded as JSON
#[derive(Debug, Clone)]
pub struct JsonResponse {
    pub status: StatusCode,

    /// `None` when the body is not valid JSON
    pub body: Option<Value>,

    /// Raw body text, kept for error messages
    pub text: String,
}

impl JsonResponse {
    /// Body text shortened for log lines and error messages
    pub fn snippet(&self) -> String {
        const MAX: usize = 200;
        if self.text.chars().count() <= MAX {
            self.text.clone()
        } else {
            let cut: String = self.text.chars().take(MAX).collect();
            format!("{}...", cut)
        }
    }
}

/// Builds an HTTP client with the configured timeouts
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.timeout())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .build()
}

/// Sends a request and reads the whole body
///
/// Only transport failures are errors here; status handling is left to the
/// caller's classifier.
pub async fn send_json(request: RequestBuilder) -> Result<JsonResponse, reqwest::Error> {
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;
    let body = serde_json::from_str(&text).ok();

    Ok(JsonResponse { status, body, text })
}
