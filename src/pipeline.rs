//! End-to-end harvest
//!
//! 1. Walk the channel history into a job queue plus provenance
//! 2. Enrich every queued post
//! 3. Assemble records in discovery order
//! 4. Write the output file atomically
//!
//! Nothing is written unless the whole pipeline completes; a walk that finds
//! no posts still writes an empty array.

use crate::config::Config;
use crate::discord::{DiscordClient, MessageSource, PageWalker, WalkSettings};
use crate::enrich::{Enricher, EnrichmentSettings, PostLookup, SocialDataClient};
use crate::output::{assemble_records, write_json_atomic};
use crate::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// What a completed run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestSummary {
    pub pages_fetched: usize,
    pub messages_seen: usize,
    pub unique_posts: usize,
    pub records_written: usize,
    pub output_path: PathBuf,
}

/// Runs the harvest against the live APIs described by `config`
pub async fn run_harvest(config: &Config) -> Result<HarvestSummary> {
    let discord = DiscordClient::new(&config.discord, &config.http)?;
    let socialdata = Arc::new(SocialDataClient::new(&config.enrichment, &config.http)?);

    run_with(&discord, socialdata, config).await
}

/// Runs the harvest with the given message source and post lookup
pub async fn run_with<S, L>(source: &S, lookup: Arc<L>, config: &Config) -> Result<HarvestSummary>
where
    S: MessageSource + ?Sized,
    L: PostLookup + 'static,
{
    let start = Instant::now();
    let output_path = PathBuf::from(&config.output.path);

    let walk = PageWalker::new(source, WalkSettings::from_config(config))
        .walk()
        .await?;

    let mut summary = HarvestSummary {
        pages_fetched: walk.pages_fetched,
        messages_seen: walk.messages_seen,
        unique_posts: walk.jobs.len(),
        records_written: 0,
        output_path: output_path.clone(),
    };

    if walk.jobs.is_empty() {
        tracing::warn!("No post links found (after filters)");
        write_json_atomic(&output_path, &Vec::<()>::new())?;
        return Ok(summary);
    }

    tracing::info!("Unique post ids collected: {}", walk.jobs.len());

    let enricher = Enricher::new(lookup, EnrichmentSettings::from_config(config));
    let enriched = enricher.enrich_all(&walk.jobs).await;

    let records = assemble_records(&walk.jobs, enriched, walk.provenance);
    write_json_atomic(&output_path, &records)?;

    summary.records_written = records.len();
    tracing::info!(
        "Saved: {} | records: {} | elapsed: {:?}",
        output_path.display(),
        records.len(),
        start.elapsed()
    );

    Ok(summary)
}
