//! Exclusion rules
//!
//! Three independent checks, all case-insensitive:
//!
//! | Check | Input | Scope |
//! |-------|-------|-------|
//! | Role | author role names | whole message |
//! | Link | canonical URL | single link |
//! | Author | resolved screen name | single post, after enrichment |
//!
//! An empty rule never matches.

use crate::config::FilterConfig;
use crate::url::normalize::path_author;

/// Compiled exclusion rules, lower-cased once
#[derive(Debug, Clone, Default)]
pub struct ExclusionRules {
    ignored_role_name: String,
    ignored_screen_name: String,
    ignored_url_substring: String,
}

impl ExclusionRules {
    pub fn new(role_name: &str, screen_name: &str, url_substring: &str) -> Self {
        Self {
            ignored_role_name: role_name.trim().to_lowercase(),
            ignored_screen_name: screen_name.trim().to_lowercase(),
            ignored_url_substring: url_substring.trim().to_lowercase(),
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(
            &config.ignored_role_name,
            &config.ignored_screen_name,
            &config.ignored_url_substring,
        )
    }

    /// True if any of the author's roles is the ignored role
    pub fn excludes_roles<S: AsRef<str>>(&self, role_names: &[S]) -> bool {
        if self.ignored_role_name.is_empty() {
            return false;
        }
        role_names
            .iter()
            .any(|name| name.as_ref().trim().to_lowercase() == self.ignored_role_name)
    }

    /// True if the link contains the ignored substring or its path names the ignored account
    pub fn excludes_link(&self, canonical_url: &str) -> bool {
        let lower = canonical_url.trim().to_lowercase();

        if !self.ignored_url_substring.is_empty() && lower.contains(&self.ignored_url_substring) {
            return true;
        }

        if self.ignored_screen_name.is_empty() {
            return false;
        }

        path_author(canonical_url)
            .map(|author| author.to_lowercase() == self.ignored_screen_name)
            .unwrap_or(false)
    }

    /// True if the resolved post author is the ignored account
    pub fn excludes_author(&self, screen_name: &str) -> bool {
        !self.ignored_screen_name.is_empty()
            && screen_name.trim().to_lowercase() == self.ignored_screen_name
    }
}
