//! URL handling module for Post-Harvester
//!
//! This module turns raw chat text into post references and decides which of
//! them are excluded:
//! - `extract`: finds candidate URLs and classifies post links
//! - `normalize`: canonical form and post id derivation
//! - `filter`: role, link and author exclusion rules

mod extract;
mod filter;
mod normalize;

// Re-export main functions
pub use extract::{extract_links, extract_post_references, is_post_url, unwrap_link_brackets};
pub use filter::ExclusionRules;
pub use normalize::{canonicalize_url, extract_post_id, path_author};

use serde::Serialize;

/// Path segment that precedes the post id in a post URL
pub const STATUS_MARKER: &str = "status";

/// Hosts whose status links are treated as posts
pub const POST_HOSTS: &[&str] = &["twitter.com/", "x.com/"];

/// A unique post discovered in chat history
///
/// Identity is the `id`; the canonical URL is kept as found first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PostReference {
    /// Post id taken from the path segment after `/status/`
    pub id: String,

    /// URL without query string and fragment
    pub canonical_url: String,
}
