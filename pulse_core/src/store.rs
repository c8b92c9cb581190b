//! Collaborator contracts: content repository, actor registry, notification sink.
//!
//! The engine never owns content or actors. It reads a snapshot at the
//! start of a tick and commits only counter deltas at the end, so edits
//! made by operators or real users while the tick runs survive.
//! [`MemoryStore`] implements every contract in memory;
//! [`SledStore`](crate::sled_store::SledStore) persists them.

use pulse_env::{ActorId, ContentId, UserId};
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

use crate::config::EngagementConfig;
use crate::model::{ContentItem, Notification, SimulatedActor};

/// Newest notifications kept by the durable inbox.
pub const INBOX_CAPACITY: usize = 100;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Content not found: {0}")]
    NotFound(ContentId),
}

/// Interactions one actor performed during a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionDelta {
    pub interactions: u64,
    pub last_action_ms: u64,
}

impl InteractionDelta {
    /// Counts one more interaction at `now_ms`.
    pub fn record(&mut self, now_ms: u64) {
        self.interactions += 1;
        self.last_action_ms = self.last_action_ms.max(now_ms);
    }
}

/// Adds like deltas in place. Returns the likes applied; ids no longer
/// present are skipped.
pub(crate) fn add_likes(items: &mut [ContentItem], deltas: &HashMap<ContentId, u64>) -> u64 {
    let mut applied = 0;
    for item in items.iter_mut() {
        if let Some(&delta) = deltas.get(&item.id) {
            item.like_count = item.like_count.saturating_add(delta);
            applied += delta;
        }
    }
    applied
}

/// Adds interaction counters in place, leaving every other field alone.
/// Returns the number of actors updated.
pub(crate) fn add_interactions(actors: &mut [SimulatedActor], deltas: &HashMap<ActorId, InteractionDelta>) -> usize {
    let mut updated = 0;
    for actor in actors.iter_mut() {
        if let Some(delta) = deltas.get(&actor.id) {
            actor.total_interactions = actor.total_interactions.saturating_add(delta.interactions);
            actor.last_action_ms = Some(actor.last_action_ms.unwrap_or(0).max(delta.last_action_ms));
            updated += 1;
        }
    }
    updated
}

pub(crate) fn set_active_in(actors: &mut [SimulatedActor], active: bool) -> usize {
    for actor in actors.iter_mut() {
        actor.is_active = active;
    }
    actors.len()
}

pub(crate) fn set_pacing_in(actors: &mut [SimulatedActor], id: &ActorId, min_secs: u32, max_secs: u32) -> bool {
    let Some(actor) = actors.iter_mut().find(|a| &a.id == id) else {
        return false;
    };
    actor.min_interval_secs = min_secs.min(max_secs);
    actor.max_interval_secs = max_secs.max(min_secs);
    true
}

/// Source of truth for content items.
pub trait ContentRepository: Send + Sync {
    /// Latest snapshot of all content.
    fn list_content(&self) -> Result<Vec<ContentItem>, StoreError>;

    /// Replaces the whole collection.
    fn replace_content(&self, items: Vec<ContentItem>) -> Result<(), StoreError>;

    /// Adds like deltas to the current collection in one read-modify-write.
    ///
    /// Only `like_count` changes. Returns the likes applied.
    fn apply_like_deltas(&self, deltas: &HashMap<ContentId, u64>) -> Result<u64, StoreError>;

    /// Adds `amount` likes to one item and commits immediately.
    ///
    /// This is the manual override path; it bypasses tick batching.
    /// Returns the new like count.
    fn boost_likes(&self, id: &ContentId, amount: u64) -> Result<u64, StoreError> {
        let mut items = self.list_content()?;
        let item = items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        item.like_count = item.like_count.saturating_add(amount);
        let new_count = item.like_count;
        self.replace_content(items)?;
        Ok(new_count)
    }
}

/// Source of truth for simulated actors.
pub trait ActorRegistry: Send + Sync {
    /// Latest snapshot of all actors.
    fn list_actors(&self) -> Result<Vec<SimulatedActor>, StoreError>;

    /// Replaces the whole collection.
    fn replace_actors(&self, actors: Vec<SimulatedActor>) -> Result<(), StoreError>;

    /// Adds interaction counters in one read-modify-write.
    ///
    /// Only `total_interactions` and `last_action_ms` change; activity and
    /// pacing are left as they are now. Returns the number of actors updated.
    fn record_interactions(&self, deltas: &HashMap<ActorId, InteractionDelta>) -> Result<usize, StoreError>;

    /// Sets every actor's activity flag. Returns the number of actors.
    fn set_all_active(&self, active: bool) -> Result<usize, StoreError> {
        let mut actors = self.list_actors()?;
        let n = set_active_in(&mut actors, active);
        self.replace_actors(actors)?;
        Ok(n)
    }

    /// Updates one actor's pacing range. Returns false if the actor is unknown.
    fn set_pacing(&self, id: &ActorId, min_secs: u32, max_secs: u32) -> Result<bool, StoreError> {
        let mut actors = self.list_actors()?;
        if !set_pacing_in(&mut actors, id, min_secs, max_secs) {
            return Ok(false);
        }
        self.replace_actors(actors)?;
        Ok(true)
    }
}

/// Last saved engine settings, reloaded when a session starts again.
pub trait ConfigStore: Send + Sync {
    fn load_config(&self) -> Result<Option<EngagementConfig>, StoreError>;

    fn save_config(&self, config: &EngagementConfig) -> Result<(), StoreError>;
}

/// Durable notification inbox.
pub trait NotificationSink: Send + Sync {
    /// Stores a notification, newest first, trimming to [`INBOX_CAPACITY`].
    fn append(&self, notification: Notification) -> Result<(), StoreError>;

    /// Notifications addressed to `user`, newest first.
    fn notifications_for(&self, user: &UserId) -> Result<Vec<Notification>, StoreError>;

    /// Marks all of `user`'s notifications read. Returns how many changed.
    fn mark_read(&self, user: &UserId) -> Result<usize, StoreError>;
}

/// Prepends and trims to capacity.
pub(crate) fn push_newest(inbox: &mut Vec<Notification>, notification: Notification) {
    inbox.insert(0, notification);
    inbox.truncate(INBOX_CAPACITY);
}

/// Marks `user`'s unread notifications read; returns the count.
pub(crate) fn mark_read_in(inbox: &mut [Notification], user: &UserId) -> usize {
    let mut changed = 0;
    for n in inbox.iter_mut().filter(|n| &n.target_user_id == user && !n.is_read) {
        n.is_read = true;
        changed += 1;
    }
    changed
}

/// In-memory implementation of all three contracts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    content: Mutex<Vec<ContentItem>>,
    actors: Mutex<Vec<SimulatedActor>>,
    inbox: Mutex<Vec<Notification>>,
    config: Mutex<Option<EngagementConfig>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with content and actors.
    pub fn with_data(content: Vec<ContentItem>, actors: Vec<SimulatedActor>) -> Self {
        Self {
            content: Mutex::new(content),
            actors: Mutex::new(actors),
            inbox: Mutex::new(Vec::new()),
            config: Mutex::new(None),
        }
    }

    /// Everything in the inbox, newest first.
    pub fn all_notifications(&self) -> Vec<Notification> {
        lock(&self.inbox).clone()
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

impl ContentRepository for MemoryStore {
    fn list_content(&self) -> Result<Vec<ContentItem>, StoreError> {
        Ok(lock(&self.content).clone())
    }

    fn replace_content(&self, items: Vec<ContentItem>) -> Result<(), StoreError> {
        *lock(&self.content) = items;
        Ok(())
    }

    fn boost_likes(&self, id: &ContentId, amount: u64) -> Result<u64, StoreError> {
        // Single lock so a concurrent replace can't interleave
        let mut content = lock(&self.content);
        let item = content
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        item.like_count = item.like_count.saturating_add(amount);
        Ok(item.like_count)
    }

    fn apply_like_deltas(&self, deltas: &HashMap<ContentId, u64>) -> Result<u64, StoreError> {
        Ok(add_likes(&mut lock(&self.content), deltas))
    }
}

impl ActorRegistry for MemoryStore {
    fn list_actors(&self) -> Result<Vec<SimulatedActor>, StoreError> {
        Ok(lock(&self.actors).clone())
    }

    fn replace_actors(&self, actors: Vec<SimulatedActor>) -> Result<(), StoreError> {
        *lock(&self.actors) = actors;
        Ok(())
    }

    fn record_interactions(&self, deltas: &HashMap<ActorId, InteractionDelta>) -> Result<usize, StoreError> {
        Ok(add_interactions(&mut lock(&self.actors), deltas))
    }

    fn set_all_active(&self, active: bool) -> Result<usize, StoreError> {
        Ok(set_active_in(&mut lock(&self.actors), active))
    }

    fn set_pacing(&self, id: &ActorId, min_secs: u32, max_secs: u32) -> Result<bool, StoreError> {
        Ok(set_pacing_in(&mut lock(&self.actors), id, min_secs, max_secs))
    }
}

impl ConfigStore for MemoryStore {
    fn load_config(&self) -> Result<Option<EngagementConfig>, StoreError> {
        Ok(*lock(&self.config))
    }

    fn save_config(&self, config: &EngagementConfig) -> Result<(), StoreError> {
        *lock(&self.config) = Some(*config);
        Ok(())
    }
}

impl NotificationSink for MemoryStore {
    fn append(&self, notification: Notification) -> Result<(), StoreError> {
        push_newest(&mut lock(&self.inbox), notification);
        Ok(())
    }

    fn notifications_for(&self, user: &UserId) -> Result<Vec<Notification>, StoreError> {
        Ok(lock(&self.inbox)
            .iter()
            .filter(|n| &n.target_user_id == user)
            .cloned()
            .collect())
    }

    fn mark_read(&self, user: &UserId) -> Result<usize, StoreError> {
        Ok(mark_read_in(&mut lock(&self.inbox), user))
    }
}
