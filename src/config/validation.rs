use crate::config::types::{
    CollectionConfig, Config, DiscordConfig, EnrichmentConfig, HttpConfig, OutputConfig,
};
use crate::ConfigError;
use url::Url;

/// Guild id shipped in the sample configuration
const PLACEHOLDER_GUILD_ID: u64 = 123456789012345678;

/// Validates the entire configuration
///
/// Runs before any network call; every error here is fatal.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_discord_config(&config.discord)?;
    validate_enrichment_config(&config.enrichment)?;
    validate_collection_config(&config.collection)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_discord_config(config: &DiscordConfig) -> Result<(), ConfigError> {
    if is_placeholder(&config.token) {
        return Err(ConfigError::Placeholder("discord.token".to_string()));
    }

    if config.guild_id == 0 || config.guild_id == PLACEHOLDER_GUILD_ID {
        return Err(ConfigError::Placeholder("discord.guild-id".to_string()));
    }

    if config.channel_id == 0 || config.channel_id == PLACEHOLDER_GUILD_ID {
        return Err(ConfigError::Placeholder("discord.channel-id".to_string()));
    }

    if config.page_limit < 1 || config.page_limit > 100 {
        return Err(ConfigError::Validation(format!(
            "page-limit must be between 1 and 100, got {}",
            config.page_limit
        )));
    }

    validate_base_url("discord.api-base", &config.api_base)
}

fn validate_enrichment_config(config: &EnrichmentConfig) -> Result<(), ConfigError> {
    if is_placeholder(&config.api_key) {
        return Err(ConfigError::Placeholder("enrichment.api-key".to_string()));
    }

    if config.max_concurrency < 1 || config.max_concurrency > 64 {
        return Err(ConfigError::Validation(format!(
            "max-concurrency must be between 1 and 64, got {}",
            config.max_concurrency
        )));
    }

    if config.batch_size < 1 {
        return Err(ConfigError::Validation(format!(
            "batch-size must be >= 1, got {}",
            config.batch_size
        )));
    }

    validate_base_url("enrichment.api-base", &config.api_base)
}

fn validate_collection_config(config: &CollectionConfig) -> Result<(), ConfigError> {
    if config.max_unique < 1 {
        return Err(ConfigError::Validation(format!(
            "max-unique must be >= 1, got {}",
            config.max_unique
        )));
    }
    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::Validation(format!("Invalid {}: {}", field, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} must use http or https, got '{}'",
            field, value
        )));
    }

    Ok(())
}

/// True for empty secrets and the `YOUR_...` markers from the sample config
fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.starts_with("YOUR_")
}
