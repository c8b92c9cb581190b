//! Sled-backed persistence for content, actors, the inbox and the engine config.
//!
//! Each collection is one JSON value under a fixed key, written as a whole
//! and flushed, the same layout the client keeps in its local key-value
//! store. Every read-modify-write runs under one write guard.

use pulse_env::{ActorId, ContentId, UserId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use crate::config::EngagementConfig;
use crate::model::{ContentItem, Notification, SimulatedActor};
use crate::store::{
    self, ActorRegistry, ConfigStore, ContentRepository, InteractionDelta, NotificationSink, StoreError,
};

pub const POSTS_KEY: &str = "pulse_posts_db_v1";
pub const BOTS_KEY: &str = "pulse_bots_config_v1";
pub const NOTIFICATIONS_KEY: &str = "pulse_notifications_db_v1";
pub const ENGINE_CONFIG_KEY: &str = "pulse_engine_config_v1";

/// Sled-based persistent store
///
/// Uses an embedded key-value database for durability.
pub struct SledStore {
    db: sled::Db,
    /// Serializes read-modify-write sequences.
    write_lock: Mutex<()>,
}

impl SledStore {
    /// Open a persistent store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)
            .map_err(|e| StoreError::Backend(format!("Failed to open sled DB: {}", e)))?;
        Ok(Self { db, write_lock: Mutex::new(()) })
    }

    /// Create a temporary store, removed on drop
    pub fn open_temporary() -> Result<Self, StoreError> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| StoreError::Backend(format!("Failed to open temp DB: {}", e)))?;
        Ok(Self { db, write_lock: Mutex::new(()) })
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let raw = self
            .db
            .get(key)
            .map_err(|e| StoreError::Backend(format!("Read of {} failed: {}", key, e)))?;
        match raw {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn get_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        Ok(self.get(key)?.unwrap_or_default())
    }

    fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.db
            .insert(key, bytes)
            .map_err(|e| StoreError::Backend(format!("Insert of {} failed: {}", key, e)))?;
        self.db
            .flush()
            .map_err(|e| StoreError::Backend(format!("Flush failed: {}", e)))?;
        Ok(())
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Read-modify-write of the actor list under the write guard.
    fn update_actors<T>(&self, f: impl FnOnce(&mut Vec<SimulatedActor>) -> T) -> Result<T, StoreError> {
        let _guard = self.guard();
        let mut actors: Vec<SimulatedActor> = self.get_list(BOTS_KEY)?;
        let out = f(&mut actors);
        self.put(BOTS_KEY, &actors)?;
        Ok(out)
    }
}

impl ConfigStore for SledStore {
    fn load_config(&self) -> Result<Option<EngagementConfig>, StoreError> {
        self.get(ENGINE_CONFIG_KEY)
    }

    fn save_config(&self, config: &EngagementConfig) -> Result<(), StoreError> {
        self.put(ENGINE_CONFIG_KEY, config)
    }
}

impl ContentRepository for SledStore {
    fn list_content(&self) -> Result<Vec<ContentItem>, StoreError> {
        self.get_list(POSTS_KEY)
    }

    fn replace_content(&self, items: Vec<ContentItem>) -> Result<(), StoreError> {
        let _guard = self.guard();
        self.put(POSTS_KEY, &items)
    }

    fn boost_likes(&self, id: &ContentId, amount: u64) -> Result<u64, StoreError> {
        let _guard = self.guard();
        let mut items: Vec<ContentItem> = self.get_list(POSTS_KEY)?;
        let item = items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        item.like_count = item.like_count.saturating_add(amount);
        let new_count = item.like_count;
        self.put(POSTS_KEY, &items)?;
        Ok(new_count)
    }

    fn apply_like_deltas(&self, deltas: &HashMap<ContentId, u64>) -> Result<u64, StoreError> {
        let _guard = self.guard();
        let mut items: Vec<ContentItem> = self.get_list(POSTS_KEY)?;
        let applied = store::add_likes(&mut items, deltas);
        if applied > 0 {
            self.put(POSTS_KEY, &items)?;
        }
        Ok(applied)
    }
}

impl ActorRegistry for SledStore {
    fn list_actors(&self) -> Result<Vec<SimulatedActor>, StoreError> {
        self.get_list(BOTS_KEY)
    }

    fn replace_actors(&self, actors: Vec<SimulatedActor>) -> Result<(), StoreError> {
        let _guard = self.guard();
        self.put(BOTS_KEY, &actors)
    }

    fn record_interactions(&self, deltas: &HashMap<ActorId, InteractionDelta>) -> Result<usize, StoreError> {
        self.update_actors(|actors| store::add_interactions(actors, deltas))
    }

    fn set_all_active(&self, active: bool) -> Result<usize, StoreError> {
        self.update_actors(|actors| store::set_active_in(actors, active))
    }

    fn set_pacing(&self, id: &ActorId, min_secs: u32, max_secs: u32) -> Result<bool, StoreError> {
        self.update_actors(|actors| store::set_pacing_in(actors, id, min_secs, max_secs))
    }
}

impl NotificationSink for SledStore {
    fn append(&self, notification: Notification) -> Result<(), StoreError> {
        let _guard = self.guard();
        let mut inbox: Vec<Notification> = self.get_list(NOTIFICATIONS_KEY)?;
        store::push_newest(&mut inbox, notification);
        self.put(NOTIFICATIONS_KEY, &inbox)
    }

    fn notifications_for(&self, user: &UserId) -> Result<Vec<Notification>, StoreError> {
        let inbox: Vec<Notification> = self.get_list(NOTIFICATIONS_KEY)?;
        Ok(inbox.into_iter().filter(|n| &n.target_user_id == user).collect())
    }

    fn mark_read(&self, user: &UserId) -> Result<usize, StoreError> {
        let _guard = self.guard();
        let mut inbox: Vec<Notification> = self.get_list(NOTIFICATIONS_KEY)?;
        let changed = store::mark_read_in(&mut inbox, user);
        if changed > 0 {
            self.put(NOTIFICATIONS_KEY, &inbox)?;
        }
        Ok(changed)
    }
}
