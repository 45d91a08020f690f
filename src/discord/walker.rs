//! Message page walker - collection stage orchestration
//!
//! Walks a channel's history newest-first, one page at a time:
//! - Extracting post links from every message
//! - Resolving author roles (only for messages that contain post links)
//! - Applying role and link exclusions
//! - Recording every sighting and queueing each post id once
//!
//! The walk ends when `max_unique` distinct posts are queued or the channel
//! has no older messages.

use crate::config::Config;
use crate::discord::client::MessageSource;
use crate::discord::roles::RoleResolver;
use crate::discord::types::{message_link, Message, Provenance};
use crate::state::WalkState;
use crate::url::{extract_post_references, ExclusionRules, PostReference};
use crate::{HarvestError, Result};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Everything the walker needs besides the message source
#[derive(Debug, Clone)]
pub struct WalkSettings {
    pub guild_id: u64,
    pub channel_id: u64,
    pub max_unique: usize,

    /// Pause before every page request
    pub page_delay: Duration,

    pub rules: ExclusionRules,
}

impl WalkSettings {
    /// Derives walker settings from the run configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            guild_id: config.discord.guild_id,
            channel_id: config.discord.channel_id,
            max_unique: config.collection.max_unique,
            page_delay: config.discord.request_delay(),
            rules: ExclusionRules::from_config(&config.filters),
        }
    }
}

/// Result of a completed walk
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Unique posts in discovery order
    pub jobs: Vec<PostReference>,

    /// Every sighting, keyed by post id, in discovery order
    pub provenance: HashMap<String, Vec<Provenance>>,

    pub pages_fetched: usize,
    pub messages_seen: usize,
}

/// Accumulates jobs and sightings for one walk
#[derive(Debug, Default)]
struct Collection {
    jobs: Vec<PostReference>,
    seen: HashSet<String>,
    provenance: HashMap<String, Vec<Provenance>>,
    target: usize,
}

impl Collection {
    fn new(target: usize) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    fn is_complete(&self) -> bool {
        self.seen.len() >= self.target
    }

    /// Records a sighting; queues the post if its id is new
    fn record(&mut self, post: &PostReference, source: &Provenance) {
        self.provenance
            .entry(post.id.clone())
            .or_default()
            .push(source.clone());

        if self.seen.insert(post.id.clone()) {
            self.jobs.push(post.clone());
        }
    }
}

/// Sequential, cursor-driven walker over a channel's history
pub struct PageWalker<'a, S: MessageSource + ?Sized> {
    source: &'a S,
    settings: WalkSettings,
}

impl<'a, S: MessageSource + ?Sized> PageWalker<'a, S> {
    pub fn new(source: &'a S, settings: WalkSettings) -> Self {
        Self { source, settings }
    }

    /// Runs the walk to completion
    ///
    /// Page fetch errors are fatal and propagate; role lookups never are.
    pub async fn walk(&self) -> Result<WalkOutcome> {
        let mut roles = RoleResolver::load(self.source).await;
        let mut collection = Collection::new(self.settings.max_unique);
        let mut outcome = WalkOutcome::default();

        let mut state = WalkState::FetchingPage;
        let mut cursor: Option<u64> = None;
        let mut page: Vec<Message> = Vec::new();

        if collection.is_complete() {
            state = transition(state, WalkState::Done)?;
        }

        while !state.is_terminal() {
            let next = match state {
                WalkState::FetchingPage => {
                    tokio::time::sleep(self.settings.page_delay).await;
                    page = self.source.fetch_page(cursor).await?;
                    outcome.pages_fetched += 1;

                    if page.is_empty() {
                        tracing::info!("Reached the start of the channel history");
                        WalkState::Done
                    } else {
                        WalkState::ProcessingPage
                    }
                }
                WalkState::ProcessingPage => {
                    outcome.messages_seen += page.len();
                    self.process_page(&page, &mut roles, &mut collection).await;

                    tracing::info!(
                        "Collected unique posts: {}/{} | jobs: {}",
                        collection.seen.len(),
                        self.settings.max_unique,
                        collection.jobs.len()
                    );

                    match next_cursor(&page, cursor) {
                        _ if collection.is_complete() => WalkState::Done,
                        Some(next) => {
                            cursor = Some(next);
                            WalkState::FetchingPage
                        }
                        None => {
                            tracing::warn!(
                                "Page yielded no older message id, stopping to avoid looping"
                            );
                            WalkState::Done
                        }
                    }
                }
                WalkState::Done => WalkState::Done,
            };

            state = transition(state, next)?;
        }

        tracing::debug!(
            "Walk finished after {} pages, {} authors resolved",
            outcome.pages_fetched,
            roles.cached_authors()
        );

        outcome.jobs = collection.jobs;
        outcome.provenance = collection.provenance;
        Ok(outcome)
    }

    /// Processes one page in message order, stopping as soon as the target is met
    async fn process_page(
        &self,
        page: &[Message],
        roles: &mut RoleResolver,
        collection: &mut Collection,
    ) {
        let rules = &self.settings.rules;

        for message in page {
            let posts: Vec<PostReference> = extract_post_references(message.text())
                .into_iter()
                .filter(|post| !rules.excludes_link(&post.canonical_url))
                .collect();

            // No candidate links, no role lookup
            if posts.is_empty() {
                continue;
            }

            let author = message.author.clone().unwrap_or_default();
            let author_roles = roles.resolve(self.source, &author.id).await;

            if rules.excludes_roles(&author_roles.role_names) {
                tracing::debug!(
                    message_id = %message.id,
                    "Skipping message from author with ignored role"
                );
                continue;
            }

            let source = Provenance {
                guild_id: self.settings.guild_id,
                channel_id: self.settings.channel_id,
                message_id: message.id.clone(),
                message_url: if message.id.is_empty() {
                    String::new()
                } else {
                    message_link(self.settings.guild_id, self.settings.channel_id, &message.id)
                },
                author_username: author.display_name(),
                author_id: author.id.clone(),
                author_roles: author_roles.role_names,
                author_role_ids: author_roles.role_ids,
                content: message.text().to_string(),
            };

            for post in &posts {
                collection.record(post, &source);
                if collection.is_complete() {
                    return;
                }
            }
        }
    }
}

/// Smallest message id on the page, if it is older than the previous cursor
///
/// Message ids grow with time, so the minimum is the oldest message and the
/// right `before` value for the next request.
pub fn next_cursor(page: &[Message], previous: Option<u64>) -> Option<u64> {
    let oldest = page.iter().filter_map(Message::numeric_id).min()?;
    match previous {
        Some(prev) if oldest >= prev => None,
        _ => Some(oldest),
    }
}

fn transition(from: WalkState, to: WalkState) -> Result<WalkState> {
    if !from.can_transition_to(to) {
        return Err(HarvestError::InvalidTransition { from, to });
    }
    tracing::trace!("Walker {} -> {}", from, to);
    Ok(to)
}
