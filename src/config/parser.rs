use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable holding the Discord token
pub const DISCORD_TOKEN_VAR: &str = "DISCORD_TOKEN";

/// Environment variable holding the SocialData bearer token
pub const SOCIALDATA_API_KEY_VAR: &str = "SOCIALDATA_API_KEY";

/// Loads, completes and validates a configuration file
///
/// Tokens found in the process environment (`DISCORD_TOKEN`,
/// `SOCIALDATA_API_KEY`) replace the values from the file, so secrets can stay
/// out of the TOML.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use post_harvester::config::load_config;
///
/// let config = load_config(Path::new("harvester.toml")).unwrap();
/// println!("Target: {} posts", config.collection.max_unique);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate(&config)?;

    Ok(config)
}

/// Replaces configured tokens with non-empty values returned by `lookup`
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = lookup(DISCORD_TOKEN_VAR).filter(|v| !v.trim().is_empty()) {
        config.discord.token = token;
    }

    if let Some(key) = lookup(SOCIALDATA_API_KEY_VAR).filter(|v| !v.trim().is_empty()) {
        config.enrichment.api_key = key;
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a saved artifact can be traced back to the settings
/// that produced it.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
