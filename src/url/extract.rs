use crate::url::normalize::{canonicalize_url, extract_post_id};
use crate::url::{PostReference, POST_HOSTS, STATUS_MARKER};
use regex::Regex;
use std::sync::LazyLock;

// Discord suppresses embeds for links written as <https://...>
static RE_BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(https?://[^>]+)>").expect("valid bracket regex"));

static RE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid url regex"));

/// Removes the angle brackets Discord uses to suppress link previews
pub fn unwrap_link_brackets(text: &str) -> String {
    RE_BRACKETED.replace_all(text, "$1").into_owned()
}

/// Returns every `http(s)://` token in the text, in order of appearance
pub fn extract_links(text: &str) -> Vec<String> {
    let text = unwrap_link_brackets(text);
    RE_URL
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// True if the URL points at a post on one of the known hosts
pub fn is_post_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    let marker = format!("/{}/", STATUS_MARKER);
    POST_HOSTS.iter().any(|host| lower.contains(host)) && lower.contains(&marker)
}

/// Extracts post references from a chat message
///
/// Non-post links and post links without a usable id are dropped silently.
/// Duplicates within the same text are kept; deduplication happens in the
/// walker, which also records every sighting.
///
/// # Examples
///
/// ```
/// use post_harvester::url::extract_post_references;
///
/// let refs = extract_post_references("look <https://x.com/alice/status/123?s=20>");
/// assert_eq!(refs.len(), 1);
/// assert_eq!(refs[0].id, "123");
/// assert_eq!(refs[0].canonical_url, "https://x.com/alice/status/123");
/// ```
pub fn extract_post_references(text: &str) -> Vec<PostReference> {
    extract_links(text)
        .into_iter()
        .filter(|link| is_post_url(link))
        .filter_map(|link| {
            let canonical_url = canonicalize_url(&link);
            extract_post_id(&canonical_url).map(|id| PostReference { id, canonical_url })
        })
        .collect()
}
