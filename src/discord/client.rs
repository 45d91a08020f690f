//! Discord REST client
//!
//! This module handles every request against the message source:
//! - Channel history pages (`before` cursor + page limit)
//! - Guild role catalogue
//! - Member role ids
//!
//! # Retry Logic
//!
//! | Condition | Action |
//! |-----------|--------|
//! | HTTP 200 | Decode body |
//! | HTTP 429 | Sleep `retry_after` from the body (default 2s), retry, budget untouched |
//! | HTTP 5xx | Retry up to `max-retries` attempts, fixed delay, then fatal |
//! | Other status | Fatal immediately |
//! | Timeout / connection error | Retry up to `max-retries` attempts, then fatal |

use crate::config::{DiscordConfig, HttpConfig};
use crate::discord::types::{GuildMember, GuildRole, Message};
use crate::http::{build_http_client, send_json, JsonResponse};
use crate::retry::{Attempt, RetryPolicy};
use crate::{ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Paged message history plus the role lookups the walker needs
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Returns up to one page of messages, newest first, older than `before`
    ///
    /// `None` requests the most recent page. An empty page means the history
    /// is exhausted.
    async fn fetch_page(&self, before: Option<u64>) -> ApiResult<Vec<Message>>;

    /// Returns the guild's role catalogue
    async fn guild_roles(&self) -> ApiResult<Vec<GuildRole>>;

    /// Returns the role ids held by a guild member
    async fn member_role_ids(&self, user_id: &str) -> ApiResult<Vec<String>>;
}

/// Discord API v9 client
#[derive(Clone)]
pub struct DiscordClient {
    client: Client,
    token: String,
    api_base: String,
    guild_id: u64,
    channel_id: u64,
    page_limit: u32,
    policy: RetryPolicy,
    default_retry_after: Duration,
}

impl DiscordClient {
    /// Builds a client from the Discord and HTTP sections of the configuration
    pub fn new(config: &DiscordConfig, http: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(http)?,
            token: config.token.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            guild_id: config.guild_id,
            channel_id: config.channel_id,
            page_limit: config.page_limit,
            policy: RetryPolicy::new(http.max_retries, Duration::from_millis(http.retry_delay_ms)),
            default_retry_after: Duration::from_millis(http.default_retry_after_ms),
        })
    }

    /// URL of a history page; the cursor is omitted for the newest page
    pub fn page_url(&self, before: Option<u64>) -> String {
        match before {
            Some(cursor) => format!(
                "{}/channels/{}/messages?before={}&limit={}",
                self.api_base, self.channel_id, cursor, self.page_limit
            ),
            None => format!(
                "{}/channels/{}/messages?limit={}",
                self.api_base, self.channel_id, self.page_limit
            ),
        }
    }

    /// GETs a URL under the retry policy and decodes the JSON body
    pub async fn get_json(&self, url: &str) -> ApiResult<Value> {
        self.policy
            .run(url, || async { self.attempt(url).await })
            .await
    }

    async fn get_typed<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let body = self.get_json(url).await?;
        serde_json::from_value(body).map_err(|e| ApiError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn attempt(&self, url: &str) -> Attempt<Value, ApiError> {
        let request = self
            .client
            .get(url)
            .header(AUTHORIZATION, self.token.as_str());

        match send_json(request).await {
            Ok(response) => classify_response(url, response, self.default_retry_after),
            Err(e) if e.is_builder() => Attempt::Fail(ApiError::Transport {
                url: url.to_string(),
                source: e,
            }),
            Err(e) => Attempt::Retry(ApiError::Transport {
                url: url.to_string(),
                source: e,
            }),
        }
    }
}

#[async_trait]
impl MessageSource for DiscordClient {
    async fn fetch_page(&self, before: Option<u64>) -> ApiResult<Vec<Message>> {
        let url = self.page_url(before);
        match self.get_json(&url).await? {
            Value::Null => Ok(Vec::new()),
            body => serde_json::from_value(body).map_err(|e| ApiError::Decode {
                url,
                message: e.to_string(),
            }),
        }
    }

    async fn guild_roles(&self) -> ApiResult<Vec<GuildRole>> {
        let url = format!("{}/guilds/{}/roles", self.api_base, self.guild_id);
        self.get_typed(&url).await
    }

    async fn member_role_ids(&self, user_id: &str) -> ApiResult<Vec<String>> {
        let url = format!(
            "{}/guilds/{}/members/{}",
            self.api_base, self.guild_id, user_id
        );
        let member: GuildMember = self.get_typed(&url).await?;
        Ok(member.roles)
    }
}

/// Maps a Discord response onto the retry policy
pub fn classify_response(
    url: &str,
    response: JsonResponse,
    default_retry_after: Duration,
) -> Attempt<Value, ApiError> {
    let status = response.status;

    if status == StatusCode::TOO_MANY_REQUESTS {
        let wait = response
            .body
            .as_ref()
            .and_then(retry_after)
            .unwrap_or(default_retry_after);
        return Attempt::Wait(wait);
    }

    if status.is_server_error() {
        return Attempt::Retry(ApiError::Server {
            url: url.to_string(),
            status: status.as_u16(),
            body: response.snippet(),
        });
    }

    if status != StatusCode::OK {
        return Attempt::Fail(ApiError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body: response.snippet(),
        });
    }

    match response.body {
        Some(body) => Attempt::Done(body),
        None => Attempt::Fail(ApiError::Decode {
            url: url.to_string(),
            message: format!("body is not JSON: {}", response.snippet()),
        }),
    }
}

/// Reads `retry_after` (seconds, possibly fractional) from a 429 body
///
/// Values that do not fit a `Duration` are treated as missing.
fn retry_after(body: &Value) -> Option<Duration> {
    body.get("retry_after")
        .and_then(Value::as_f64)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}
