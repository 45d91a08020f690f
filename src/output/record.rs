use crate::discord::Provenance;
use crate::enrich::PostMetadata;
use serde::Serialize;

/// One element of the output array
///
/// Field names match the JSON consumed downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedRecord {
    pub tweet_id: String,
    pub tweet_url: String,
    pub discord_sources: Vec<Provenance>,
    pub twitter: PostMetadata,
}
