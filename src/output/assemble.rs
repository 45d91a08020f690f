use crate::discord::Provenance;
use crate::enrich::EnrichedPost;
use crate::output::record::EnrichedRecord;
use crate::url::PostReference;
use std::collections::HashMap;

/// Builds output records in job-queue order
///
/// Jobs without an enrichment result are omitted, so the output can be
/// shorter than the queue. Each record carries every sighting of its post.
pub fn assemble_records(
    jobs: &[PostReference],
    mut enriched: HashMap<String, EnrichedPost>,
    mut provenance: HashMap<String, Vec<Provenance>>,
) -> Vec<EnrichedRecord> {
    let mut records = Vec::with_capacity(enriched.len());

    for job in jobs {
        let Some(post) = enriched.remove(&job.id) else {
            continue;
        };

        records.push(EnrichedRecord {
            tweet_id: post.post_id,
            tweet_url: job.canonical_url.clone(),
            discord_sources: provenance.remove(&job.id).unwrap_or_default(),
            twitter: post.metadata,
        });
    }

    records
}
