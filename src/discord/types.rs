use serde::{Deserialize, Serialize};

/// A channel message as returned by `GET /channels/{id}/messages`
///
/// Only the fields the walker reads are modeled; everything is defaulted so a
/// sparse message never fails the whole page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub content: Option<String>,

    #[serde(default)]
    pub author: Option<Author>,
}

impl Message {
    /// Message id as a number, used for the pagination cursor
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.parse().ok()
    }

    /// Message text, empty when absent
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub discriminator: Option<String>,
}

impl Author {
    /// `name#1234` for legacy accounts, the bare username otherwise
    pub fn display_name(&self) -> String {
        match self.discriminator.as_deref() {
            Some(d) if !d.is_empty() && d != "0" => format!("{}#{}", self.username, d),
            _ => self.username.clone(),
        }
    }
}

/// Entry of `GET /guilds/{id}/roles`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuildRole {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,
}

/// Body of `GET /guilds/{id}/members/{user}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuildMember {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// One sighting of a post link in a chat message
///
/// Several sightings may share a post id; all of them are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub guild_id: u64,
    pub channel_id: u64,
    pub message_id: String,
    pub message_url: String,
    pub author_username: String,
    pub author_id: String,
    pub author_roles: Vec<String>,
    pub author_role_ids: Vec<String>,
    pub content: String,
}

/// Jump link to a message in the Discord client
pub fn message_link(guild_id: u64, channel_id: u64, message_id: &str) -> String {
    format!(
        "https://discord.com/channels/{}/{}/{}",
        guild_id, channel_id, message_id
    )
}
