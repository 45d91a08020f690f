use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Post-Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub discord: DiscordConfig,
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub filters: FilterConfig,
    pub collection: CollectionConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Message source (Discord) configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiscordConfig {
    /// User or bot token sent in the `authorization` header.
    /// The `DISCORD_TOKEN` environment variable takes precedence.
    #[serde(default)]
    pub token: String,

    /// Guild (server) whose roles are resolved
    pub guild_id: u64,

    /// Channel whose history is walked
    pub channel_id: u64,

    #[serde(default = "default_discord_api_base")]
    pub api_base: String,

    /// Messages requested per page (Discord caps this at 100)
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Fixed pause before every page request (milliseconds)
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

/// Enrichment API (SocialData) configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EnrichmentConfig {
    /// Bearer token. The `SOCIALDATA_API_KEY` environment variable takes precedence.
    #[serde(default)]
    pub api_key: String,

    /// Prefix the post id is appended to
    #[serde(default = "default_enrichment_api_base")]
    pub api_base: String,

    /// Maximum number of lookups in flight at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: u32,

    /// Jobs per progress batch
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Pause after a 429 from the enrichment API (milliseconds)
    #[serde(default = "default_rate_limit_sleep_ms")]
    pub rate_limit_sleep_ms: u64,
}

/// Exclusion rules applied while collecting and after enrichment
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FilterConfig {
    /// Messages from authors holding this role are skipped entirely
    #[serde(default)]
    pub ignored_role_name: String,

    /// Posts authored by this account are dropped (URL path or resolved handle)
    #[serde(default)]
    pub ignored_screen_name: String,

    /// Links containing this text are dropped
    #[serde(default)]
    pub ignored_url_substring: String,
}

/// Collection target
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CollectionConfig {
    /// Stop paging once this many distinct posts have been accepted
    pub max_unique: usize,
}

/// Shared HTTP behavior for both APIs
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempt budget for 5xx responses and transport errors
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between budgeted retries against the message source (milliseconds)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Delay between budgeted retries against the enrichment API (milliseconds)
    #[serde(default = "default_enrichment_retry_delay_ms")]
    pub enrichment_retry_delay_ms: u64,

    /// Wait used when a 429 from the message source carries no `retry_after`
    #[serde(default = "default_retry_after_ms")]
    pub default_retry_after_ms: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON array written at the end of the run
    #[serde(default = "default_output_path")]
    pub path: String,
}

impl DiscordConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl EnrichmentConfig {
    pub fn rate_limit_sleep(&self) -> Duration {
        Duration::from_millis(self.rate_limit_sleep_ms)
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            enrichment_retry_delay_ms: default_enrichment_retry_delay_ms(),
            default_retry_after_ms: default_retry_after_ms(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

fn default_discord_api_base() -> String {
    "https://discord.com/api/v9".to_string()
}

fn default_enrichment_api_base() -> String {
    "https://api.socialdata.tools/twitter/tweets/".to_string()
}

fn default_page_limit() -> u32 {
    100
}

fn default_request_delay_ms() -> u64 {
    350
}

fn default_max_concurrency() -> u32 {
    6
}

fn default_batch_size() -> u32 {
    200
}

fn default_rate_limit_sleep_ms() -> u64 {
    5_000
}

fn default_timeout_secs() -> u64 {
    25
}

fn default_max_retries() -> u32 {
    6
}

fn default_retry_delay_ms() -> u64 {
    2_000
}

fn default_enrichment_retry_delay_ms() -> u64 {
    3_000
}

fn default_retry_after_ms() -> u64 {
    2_000
}

fn default_output_path() -> String {
    "tweets_from_discord.json".to_string()
}
