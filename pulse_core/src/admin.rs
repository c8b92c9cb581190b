//! Operator controls over the engine: activation, speed, targeting,
//! manual like boosts and per-actor pacing.
//!
//! Everything except [`AdminConsole::overview`] requires the
//! `manage_system` permission. With a [`ConfigStore`] attached, every
//! settings change is saved so the next session resumes from it.

use pulse_env::{ActorId, ContentId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{ConfigError, EngagementConfig, EngagementControl, SpeedTier};
use crate::store::{ActorRegistry, ConfigStore, ContentRepository, StoreError};

/// Admin errors
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Permission denied: {0} requires manage_system")]
    PermissionDenied(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// What an operator may do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPermissions {
    pub manage_users: bool,
    pub manage_content: bool,
    pub manage_system: bool,
    pub view_analytics: bool,
}

impl AdminPermissions {
    pub fn full() -> Self {
        Self {
            manage_users: true,
            manage_content: true,
            manage_system: true,
            view_analytics: true,
        }
    }

    pub fn read_only() -> Self {
        Self {
            view_analytics: true,
            ..Self::default()
        }
    }
}

/// Read-only summary for dashboards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineOverview {
    pub total_actors: usize,
    pub active_actors: usize,
    pub config: EngagementConfig,
}

/// Builds the live control from the last saved settings.
///
/// With nothing saved yet, `fallback` is used and saved. A saved config
/// that no longer validates is replaced by `fallback` as well.
pub fn restore_control<S>(store: &S, fallback: EngagementConfig) -> Result<EngagementControl, AdminError>
where
    S: ConfigStore + ?Sized,
{
    if let Some(saved) = store.load_config()? {
        match EngagementControl::new(saved) {
            Ok(control) => {
                info!(
                    "Resuming at {}x (verified priority {})",
                    saved.speed_multiplier, saved.prioritize_verified_authors
                );
                return Ok(control);
            }
            Err(e) => warn!("Ignoring saved config: {}", e),
        }
    }
    let control = EngagementControl::new(fallback)?;
    store.save_config(&fallback)?;
    Ok(control)
}

pub struct AdminConsole<C, A>
where
    C: ContentRepository + ?Sized,
    A: ActorRegistry + ?Sized,
{
    control: EngagementControl,
    content: Arc<C>,
    actors: Arc<A>,
    permissions: AdminPermissions,
    config_store: Option<Arc<dyn ConfigStore>>,
}

impl<C, A> AdminConsole<C, A>
where
    C: ContentRepository + ?Sized,
    A: ActorRegistry + ?Sized,
{
    pub fn new(control: EngagementControl, content: Arc<C>, actors: Arc<A>, permissions: AdminPermissions) -> Self {
        Self {
            control,
            content,
            actors,
            permissions,
            config_store: None,
        }
    }

    /// Saves the settings after every change.
    pub fn with_config_store(mut self, store: Arc<dyn ConfigStore>) -> Self {
        self.config_store = Some(store);
        self
    }

    pub fn permissions(&self) -> AdminPermissions {
        self.permissions
    }

    fn require_system(&self, operation: &'static str) -> Result<(), AdminError> {
        if self.permissions.manage_system {
            Ok(())
        } else {
            Err(AdminError::PermissionDenied(operation))
        }
    }

    fn persist_config(&self) -> Result<(), AdminError> {
        if let Some(store) = &self.config_store {
            store.save_config(&self.control.snapshot())?;
        }
        Ok(())
    }

    /// Activates every actor. Returns the number touched.
    pub fn activate_all(&self) -> Result<usize, AdminError> {
        self.require_system("activate_all")?;
        let n = self.actors.set_all_active(true)?;
        info!("Activated {} actors", n);
        Ok(n)
    }

    /// Deactivates every actor; the next tick does nothing.
    pub fn deactivate_all(&self) -> Result<usize, AdminError> {
        self.require_system("deactivate_all")?;
        let n = self.actors.set_all_active(false)?;
        info!("Deactivated {} actors", n);
        Ok(n)
    }

    pub fn set_speed_tier(&self, tier: SpeedTier) -> Result<(), AdminError> {
        self.require_system("set_speed_tier")?;
        self.control.set_speed_tier(tier);
        info!("Speed set to {} ({}x)", tier, tier.multiplier());
        self.persist_config()
    }

    /// Sets an arbitrary multiplier; rejects zero, negative and non-finite.
    pub fn set_speed_multiplier(&self, multiplier: f64) -> Result<(), AdminError> {
        self.require_system("set_speed_multiplier")?;
        self.control.set_speed_multiplier(multiplier)?;
        info!("Speed set to {}x", multiplier);
        self.persist_config()
    }

    /// Returns the new setting.
    pub fn toggle_prioritize_verified(&self) -> Result<bool, AdminError> {
        self.require_system("toggle_prioritize_verified")?;
        let enabled = self.control.toggle_prioritize_verified();
        info!("Verified prioritization {}", if enabled { "on" } else { "off" });
        self.persist_config()?;
        Ok(enabled)
    }

    /// Adds likes to one item right away, outside of tick batching.
    /// Returns the new like count.
    pub fn boost_likes(&self, content: &ContentId, amount: u64) -> Result<u64, AdminError> {
        self.require_system("boost_likes")?;
        let likes = self.content.boost_likes(content, amount)?;
        info!("Boosted {} by {} to {} likes", content, amount, likes);
        Ok(likes)
    }

    /// Returns false if the actor is unknown.
    pub fn set_pacing(&self, actor: &ActorId, min_secs: u32, max_secs: u32) -> Result<bool, AdminError> {
        self.require_system("set_pacing")?;
        Ok(self.actors.set_pacing(actor, min_secs, max_secs)?)
    }

    pub fn overview(&self) -> Result<EngineOverview, AdminError> {
        let actors = self.actors.list_actors()?;
        Ok(EngineOverview {
            total_actors: actors.len(),
            active_actors: actors.iter().filter(|a| a.is_active).count(),
            config: self.control.snapshot(),
        })
    }
}
