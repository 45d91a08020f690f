//! Configuration module for Post-Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! API tokens may also come from the environment (`DISCORD_TOKEN`,
//! `SOCIALDATA_API_KEY`), which wins over the file.
//!
//! # Example
//!
//! ```no_run
//! use post_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvester.toml")).unwrap();
//! println!("Walking channel {}", config.discord.channel_id);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CollectionConfig, Config, DiscordConfig, EnrichmentConfig, FilterConfig, HttpConfig,
    OutputConfig,
};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, compute_config_hash, load_config, load_config_with_hash,
    DISCORD_TOKEN_VAR, SOCIALDATA_API_KEY_VAR,
};
pub use validation::validate;
