//! Projection of the SocialData payload
//!
//! The API returns a large, loosely specified tweet object. It stays a
//! `serde_json::Value` at the boundary and only the fields written to the
//! output are lifted into [`PostMetadata`].

use serde::Serialize;
use serde_json::Value;

/// Media sources scanned for images, in priority order
const MEDIA_PATHS: &[&[&str]] = &[&["extended_entities", "media"], &["entities", "media"], &["media"]];

/// Post metadata as written to the output file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostMetadata {
    pub author_screen_name: String,
    pub author_name: String,
    pub author_profile_image: Option<String>,
    pub likes: i64,
    pub views: i64,
    pub comments: i64,
    pub retweets: i64,
    pub images: Vec<String>,
    pub text: String,
}

impl PostMetadata {
    pub fn from_payload(payload: &Value) -> Self {
        let user = payload.get("user").filter(|u| u.is_object());
        let user_str = |key: &str| user.and_then(|u| non_empty_str(u, key));

        Self {
            author_screen_name: user_str("screen_name")
                .or_else(|| user_str("username"))
                .unwrap_or_default()
                .to_string(),
            author_name: user_str("name").unwrap_or_default().to_string(),
            author_profile_image: user_str("profile_image_url_https")
                .or_else(|| user_str("profile_image_url"))
                .map(str::to_string),
            likes: count(payload, "favorite_count"),
            views: count(payload, "views_count"),
            comments: count(payload, "reply_count"),
            retweets: count(payload, "retweet_count"),
            images: collect_images(payload),
            text: non_empty_str(payload, "full_text")
                .or_else(|| non_empty_str(payload, "text"))
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// The post id reported by the payload (`id_str`, then `id`)
pub fn payload_post_id(payload: &Value) -> Option<String> {
    if let Some(id) = non_empty_str(payload, "id_str") {
        return Some(id.to_string());
    }

    match payload.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Photo URLs from every media list, de-duplicated in first-seen order
pub fn collect_images(payload: &Value) -> Vec<String> {
    let mut images: Vec<String> = Vec::new();

    for path in MEDIA_PATHS {
        let Some(items) = lookup_path(payload, path).and_then(Value::as_array) else {
            continue;
        };

        for item in items {
            let is_image = matches!(
                item.get("type").and_then(Value::as_str),
                Some("photo") | Some("image")
            );
            if !is_image {
                continue;
            }

            let url = non_empty_str(item, "media_url_https")
                .or_else(|| non_empty_str(item, "media_url"))
                .or_else(|| non_empty_str(item, "url"));

            if let Some(url) = url {
                if !images.iter().any(|seen| seen == url) {
                    images.push(url.to_string());
                }
            }
        }
    }

    images
}

fn lookup_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(key))
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Numeric counters; anything that is not a JSON number counts as zero
fn count(value: &Value, key: &str) -> i64 {
    match value.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        _ => 0,
    }
}
