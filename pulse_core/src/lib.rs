//! Pulse Core - synthetic engagement engine
//!
//! Two subsystems sit on top of the content and actor stores:
//! 1. **Reactor Generator**: deterministic "who reacted" identities for a
//!    like count, synthesized on demand and never stored
//! 2. **Engagement Scheduler**: a paced loop where active simulated actors
//!    like content, subject to a cool-down on brand-new items, and notify
//!    the viewer when their own content is liked
//!
//! Time and randomness come from a [`pulse_env::PulseContext`], so the same
//! scheduler runs against tokio in production and a virtual clock in
//! simulation.

pub mod admin;
pub mod config;
pub mod freshness;
pub mod model;
pub mod names;
pub mod reactor;
pub mod roster;
pub mod scheduler;
pub mod session;
pub mod sled_store;
pub mod store;

#[cfg(test)]
mod testing;

// Re-export key types for convenience
pub use admin::{restore_control, AdminConsole, AdminError, AdminPermissions, EngineOverview};
pub use config::{ConfigError, EngagementConfig, EngagementControl, SpeedTier};
pub use model::{
    ContentItem, Identity, Notification, NotificationKind, ReactionType, Role, SimulatedActor,
    VerificationTier,
};
pub use reactor::{GenderSplit, ReactorGenerator};
pub use scheduler::{EngagementScheduler, EngagementStats, LiveInbox, TickReport};
pub use session::SessionHandle;
pub use sled_store::SledStore;
pub use store::{
    ActorRegistry, ConfigStore, ContentRepository, InteractionDelta, MemoryStore, NotificationSink, StoreError,
};
