//! Bounded-concurrency enrichment of the job queue
//!
//! A single semaphore caps the number of lookups in flight across the whole
//! queue. The queue is cut into batches only so progress can be logged; a
//! batch is fully awaited before the next one starts.

use crate::config::Config;
use crate::enrich::client::{Absent, PostLookup};
use crate::enrich::metadata::{payload_post_id, PostMetadata};
use crate::url::{ExclusionRules, PostReference};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// A post that was fetched and survived the author check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedPost {
    /// Id reported by the API, or the job id when the payload has none
    pub post_id: String,
    pub metadata: PostMetadata,
}

/// Knobs for the enrichment stage
#[derive(Debug, Clone)]
pub struct EnrichmentSettings {
    pub max_concurrency: usize,
    pub batch_size: usize,
    pub rules: ExclusionRules,
}

impl EnrichmentSettings {
    /// Derives enrichment settings from the run configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_concurrency: config.enrichment.max_concurrency as usize,
            batch_size: config.enrichment.batch_size as usize,
            rules: ExclusionRules::from_config(&config.filters),
        }
    }
}

/// Runs lookups for a job queue
pub struct Enricher<L: PostLookup + 'static> {
    lookup: Arc<L>,
    semaphore: Arc<Semaphore>,
    settings: EnrichmentSettings,
}

impl<L: PostLookup + 'static> Enricher<L> {
    pub fn new(lookup: Arc<L>, settings: EnrichmentSettings) -> Self {
        let permits = settings.max_concurrency.max(1);
        Self {
            lookup,
            semaphore: Arc::new(Semaphore::new(permits)),
            settings,
        }
    }

    /// Enriches every job, returning the successful ones keyed by job id
    ///
    /// Absent posts are logged and left out of the map.
    pub async fn enrich_all(&self, jobs: &[PostReference]) -> HashMap<String, EnrichedPost> {
        let mut results: HashMap<String, EnrichedPost> = HashMap::with_capacity(jobs.len());
        let batch_size = self.settings.batch_size.max(1);
        let mut processed = 0usize;

        for batch in jobs.chunks(batch_size) {
            let mut tasks = JoinSet::new();

            for job in batch {
                let lookup = Arc::clone(&self.lookup);
                let semaphore = Arc::clone(&self.semaphore);
                let rules = self.settings.rules.clone();
                let job = job.clone();

                tasks.spawn(async move {
                    let result = match semaphore.acquire_owned().await {
                        Ok(_permit) => enrich_one(lookup.as_ref(), &rules, &job).await,
                        Err(e) => Err(Absent::Transport(e.to_string())),
                    };
                    (job.id, result)
                });
            }

            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((id, Ok(post))) => {
                        results.insert(id, post);
                    }
                    Ok((id, Err(reason))) => {
                        tracing::debug!(post_id = %id, "Skipping post: {}", reason);
                    }
                    Err(e) => {
                        tracing::warn!("Enrichment task failed: {}", e);
                    }
                }
            }

            processed += batch.len();
            tracing::info!(
                "Processed: {}/{} | output: {}",
                processed,
                jobs.len(),
                results.len()
            );
        }

        results
    }
}

/// Fetches one post and applies the author exclusion
pub async fn enrich_one<L: PostLookup + ?Sized>(
    lookup: &L,
    rules: &ExclusionRules,
    job: &PostReference,
) -> Result<EnrichedPost, Absent> {
    let payload = lookup.lookup(&job.id).await?;
    let metadata = PostMetadata::from_payload(&payload);

    if rules.excludes_author(&metadata.author_screen_name) {
        return Err(Absent::Excluded(metadata.author_screen_name));
    }

    Ok(EnrichedPost {
        post_id: payload_post_id(&payload).unwrap_or_else(|| job.id.clone()),
        metadata,
    })
}
