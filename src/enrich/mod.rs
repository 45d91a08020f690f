//! Enrichment stage
//!
//! Looks up every queued post on SocialData with bounded concurrency and
//! projects the payload into the fields written to the output file.

mod client;
mod fetcher;
mod metadata;

pub use client::{classify_response, Absent, PostLookup, SocialDataClient};
pub use fetcher::{enrich_one, EnrichedPost, Enricher, EnrichmentSettings};
pub use metadata::{collect_images, payload_post_id, PostMetadata};
