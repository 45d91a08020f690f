use crate::url::STATUS_MARKER;
use url::Url;

/// Strips the query string and fragment from a URL
///
/// Works on the raw string so that links the `url` crate would reject are
/// still canonicalized the same way. Idempotent.
///
/// # Examples
///
/// ```
/// use post_harvester::url::canonicalize_url;
///
/// let canonical = canonicalize_url("https://x.com/alice/status/123?s=20#reply");
/// assert_eq!(canonical, "https://x.com/alice/status/123");
/// ```
pub fn canonicalize_url(url: &str) -> String {
    let without_query = url.split('?').next().unwrap_or_default();
    without_query
        .split('#')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Derives the post id from a post URL
///
/// The id is the path segment directly after `status`, with any `?`/`#`
/// remnant removed. Returns `None` when the URL does not parse, has no
/// `status` segment, or the following segment is empty.
pub fn extract_post_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed.path().trim_matches('/').split('/').collect();

    let marker = segments.iter().position(|s| *s == STATUS_MARKER)?;
    let raw = segments.get(marker + 1)?;
    let id = raw.split('?').next()?.split('#').next()?;

    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Returns the account name in a `/<user>/status/<id>` path
///
/// `None` for any other path shape, such as `/i/web/status/<id>`.
pub fn path_author(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let segments: Vec<&str> = parsed.path().trim_matches('/').split('/').collect();

    if segments.len() >= 3 && segments[1].eq_ignore_ascii_case(STATUS_MARKER) {
        Some(segments[0].to_string())
    } else {
        None
    }
}
