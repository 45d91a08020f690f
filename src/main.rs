//! Post-Harvester main entry point
//!
//! This is the command-line interface for the Discord post harvester.

use anyhow::Context;
use clap::Parser;
use post_harvester::config::{load_config_with_hash, Config};
use post_harvester::pipeline::run_harvest;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Post-Harvester: collects X/Twitter posts shared in a Discord channel
///
/// Post-Harvester walks a channel's message history newest-first, keeps the
/// post links that pass the author and link filters, enriches each unique
/// post through SocialData, and writes a single JSON file.
#[derive(Parser, Debug)]
#[command(name = "post-harvester")]
#[command(version = "1.0.0")]
#[command(about = "Collects X/Twitter posts shared in a Discord channel", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the run settings without calling any API
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Tokens may come from a .env file next to the binary
    dotenvy::dotenv().ok();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e)
                .with_context(|| format!("loading configuration from {}", cli.config.display()));
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_harvest(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("post_harvester=info,warn"),
            1 => EnvFilter::new("post_harvester=debug,info"),
            2 => EnvFilter::new("post_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Shows every setting a harvest would use, with credentials masked
fn handle_dry_run(config: &Config) {
    println!("=== Post-Harvester Dry Run ===\n");

    println!("Discord:");
    println!("  Token: {}", mask_secret(&config.discord.token));
    println!("  Guild: {}", config.discord.guild_id);
    println!("  Channel: {}", config.discord.channel_id);
    println!("  API base: {}", config.discord.api_base);
    println!("  Page limit: {}", config.discord.page_limit);
    println!("  Page delay: {}ms", config.discord.request_delay_ms);

    println!("\nEnrichment:");
    println!("  API key: {}", mask_secret(&config.enrichment.api_key));
    println!("  API base: {}", config.enrichment.api_base);
    println!("  Max concurrency: {}", config.enrichment.max_concurrency);
    println!("  Batch size: {}", config.enrichment.batch_size);
    println!("  Rate-limit sleep: {}ms", config.enrichment.rate_limit_sleep_ms);

    println!("\nFilters:");
    println!("  Ignored role: {:?}", config.filters.ignored_role_name);
    println!("  Ignored screen name: {:?}", config.filters.ignored_screen_name);
    println!("  Ignored URL substring: {:?}", config.filters.ignored_url_substring);

    println!("\nHTTP:");
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Max retries: {}", config.http.max_retries);
    println!("  Retry delay: {}ms", config.http.retry_delay_ms);

    println!("\nOutput:");
    println!("  Path: {}", config.output.path);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would collect up to {} unique posts",
        config.collection.max_unique
    );
}

/// Runs the harvest until it finishes or the user interrupts it
async fn handle_harvest(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Harvesting channel {} (target: {} unique posts)",
        config.discord.channel_id,
        config.collection.max_unique
    );

    tokio::select! {
        result = run_harvest(&config) => match result {
            Ok(summary) => {
                tracing::info!(
                    "Harvest completed: {} pages, {} messages, {} unique posts, {} records",
                    summary.pages_fetched,
                    summary.messages_seen,
                    summary.unique_posts,
                    summary.records_written
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!("Harvest failed: {}", e);
                Err(e).context("harvest failed")
            }
        },
        _ = tokio::signal::ctrl_c() => {
            // Output is only written at the end, so nothing partial is left behind
            tracing::warn!("Interrupted; no output written");
            Ok(())
        }
    }
}

/// Keeps the first and last few characters of a credential
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
