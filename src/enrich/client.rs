//! SocialData tweet lookup client
//!
//! # Retry Logic
//!
//! | Condition | Action |
//! |-----------|--------|
//! | HTTP 2xx | Decode body |
//! | HTTP 429 | Sleep `rate-limit-sleep`, retry, budget untouched |
//! | HTTP 403 / 404 | Absent (deleted, private or suspended) |
//! | HTTP 5xx | Retry up to `max-retries` attempts, then absent |
//! | Other status | Absent |
//! | Timeout / connection error / bad JSON | Retry up to `max-retries` attempts, then absent |
//!
//! Nothing here is fatal: a post that cannot be fetched is left out of the output.

use crate::config::{EnrichmentConfig, HttpConfig};
use crate::http::{build_http_client, send_json, JsonResponse};
use crate::retry::{Attempt, RetryPolicy};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Why a post produced no record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Absent {
    #[error("post not available (HTTP {0})")]
    NotAvailable(u16),

    #[error("lookup rejected (HTTP {0})")]
    Rejected(u16),

    #[error("server error (HTTP {0})")]
    ServerError(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unreadable payload: {0}")]
    Decode(String),

    #[error("authored by ignored account '{0}'")]
    Excluded(String),
}

/// One lookup per post id
#[async_trait]
pub trait PostLookup: Send + Sync {
    /// Returns the raw payload for a post, or the reason it is absent
    async fn lookup(&self, post_id: &str) -> Result<Value, Absent>;
}

/// SocialData API client
#[derive(Clone)]
pub struct SocialDataClient {
    client: Client,
    api_key: String,
    api_base: String,
    policy: RetryPolicy,
    rate_limit_sleep: Duration,
}

impl SocialDataClient {
    pub fn new(config: &EnrichmentConfig, http: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(http)?,
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
            policy: RetryPolicy::new(
                http.max_retries,
                Duration::from_millis(http.enrichment_retry_delay_ms),
            ),
            rate_limit_sleep: config.rate_limit_sleep(),
        })
    }

    pub fn post_url(&self, post_id: &str) -> String {
        format!("{}{}", self.api_base, post_id)
    }

    async fn attempt(&self, url: &str) -> Attempt<Value, Absent> {
        let request = self.client.get(url).bearer_auth(&self.api_key);

        match send_json(request).await {
            Ok(response) => classify_response(response, self.rate_limit_sleep),
            Err(e) if e.is_builder() => Attempt::Fail(Absent::Transport(e.to_string())),
            Err(e) => Attempt::Retry(Absent::Transport(e.to_string())),
        }
    }
}

#[async_trait]
impl PostLookup for SocialDataClient {
    async fn lookup(&self, post_id: &str) -> Result<Value, Absent> {
        let url = self.post_url(post_id);
        let label = format!("SocialData {}", post_id);
        self.policy
            .run(&label, || async { self.attempt(&url).await })
            .await
    }
}

/// Maps a SocialData response onto the retry policy
pub fn classify_response(response: JsonResponse, rate_limit_sleep: Duration) -> Attempt<Value, Absent> {
    let status = response.status;

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Attempt::Wait(rate_limit_sleep);
    }

    if status == StatusCode::FORBIDDEN || status == StatusCode::NOT_FOUND {
        return Attempt::Fail(Absent::NotAvailable(status.as_u16()));
    }

    if status.is_server_error() {
        return Attempt::Retry(Absent::ServerError(status.as_u16()));
    }

    if !status.is_success() {
        return Attempt::Fail(Absent::Rejected(status.as_u16()));
    }

    match response.body {
        Some(body) if body.is_object() => Attempt::Done(body),
        _ => Attempt::Retry(Absent::Decode(response.snippet())),
    }
}
