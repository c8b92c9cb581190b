//! Pulse Environment Abstraction Layer
//!
//! This crate provides the "Sans-IO" abstraction allowing the Pulse
//! engagement engine to run in both **Production** (tokio) and
//! **Simulation** (virtual clock) environments.
//!
//! # Core Concept
//!
//! Every source of non-determinism the engine touches is routed through
//! [`PulseContext`]:
//! - Time (`now()`, `system_time()`, `sleep()`)
//! - Task spawning (`spawn()`)
//! - Randomness (`derive_rng()`)
//!
//! By deriving all entropy from a single 64-bit seed, any engagement run
//! becomes reproducible via its seed number.
//!
//! # Example
//!
//! ```ignore
//! use pulse_env::PulseContext;
//!
//! async fn engagement_loop<Ctx: PulseContext>(ctx: &Ctx, mut stop: watch::Receiver<bool>) {
//!     loop {
//!         tokio::select! {
//!             _ = stop.changed() => break,
//!             _ = ctx.sleep(Duration::from_millis(2000)) => tick(),
//!         }
//!     }
//! }
//! ```

mod context;
mod types;
mod error;
mod tokio_impl;

pub use context::PulseContext;
pub use types::{ActorId, ContentId, NotificationId, UserId};
pub use error::EnvError;
pub use tokio_impl::TokioContext;
