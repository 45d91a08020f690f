//! Author role resolution
//!
//! The guild role catalogue is fetched once per run; member role ids are
//! fetched lazily, once per author, and cached for the rest of the run. Every
//! lookup fails open: an author whose roles cannot be read simply has none.

use crate::discord::client::MessageSource;
use std::collections::HashMap;

/// Role ids and their resolved names, in the order Discord returned them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorRoles {
    pub role_ids: Vec<String>,
    pub role_names: Vec<String>,
}

/// Per-run role cache
#[derive(Debug, Default)]
pub struct RoleResolver {
    /// role id -> role name
    role_names: HashMap<String, String>,

    /// author id -> resolved roles
    cache: HashMap<String, AuthorRoles>,
}

impl RoleResolver {
    /// Creates a resolver with a known role catalogue
    pub fn with_role_names(role_names: HashMap<String, String>) -> Self {
        Self {
            role_names,
            cache: HashMap::new(),
        }
    }

    /// Fetches the guild role catalogue, falling back to an empty one
    pub async fn load<S: MessageSource + ?Sized>(source: &S) -> Self {
        match source.guild_roles().await {
            Ok(roles) => {
                let role_names: HashMap<String, String> = roles
                    .into_iter()
                    .filter(|role| !role.id.is_empty())
                    .map(|role| (role.id, role.name))
                    .collect();
                tracing::info!("Loaded {} guild roles", role_names.len());
                Self::with_role_names(role_names)
            }
            Err(e) => {
                tracing::warn!("Cannot fetch guild roles, role filter disabled: {}", e);
                Self::default()
            }
        }
    }

    /// Returns the author's roles, asking the source at most once per author
    pub async fn resolve<S: MessageSource + ?Sized>(
        &mut self,
        source: &S,
        author_id: &str,
    ) -> AuthorRoles {
        if let Some(cached) = self.cache.get(author_id) {
            return cached.clone();
        }

        let role_ids = if author_id.is_empty() {
            Vec::new()
        } else {
            match source.member_role_ids(author_id).await {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::warn!(author_id, "Member lookup failed, assuming no roles: {}", e);
                    Vec::new()
                }
            }
        };

        let roles = AuthorRoles {
            role_names: role_ids.iter().map(|id| self.role_name(id)).collect(),
            role_ids,
        };

        self.cache.insert(author_id.to_string(), roles.clone());
        roles
    }

    /// Name of a role, or the raw id when the catalogue does not know it
    pub fn role_name(&self, role_id: &str) -> String {
        self.role_names
            .get(role_id)
            .cloned()
            .unwrap_or_else(|| role_id.to_string())
    }

    /// Number of authors resolved so far
    pub fn cached_authors(&self) -> usize {
        self.cache.len()
    }
}
