//! Discord message source
//!
//! This module contains the collection stage:
//! - REST client with the message-source retry policy
//! - Author role resolution with a per-run cache
//! - The page walker that turns channel history into a job queue

mod client;
mod roles;
mod types;
mod walker;

pub use client::{classify_response, DiscordClient, MessageSource};
pub use roles::{AuthorRoles, RoleResolver};
pub use types::{message_link, Author, GuildMember, GuildRole, Message, Provenance};
pub use walker::{next_cursor, PageWalker, WalkOutcome, WalkSettings};
