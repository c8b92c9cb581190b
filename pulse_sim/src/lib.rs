//! Pulse Deterministic Simulation Testing (DST) Harness
//!
//! Runs the engagement engine against a virtual clock so that every run
//! is a pure function of its seed.
//!
//! # Core Principle
//!
//! All sources of non-determinism are intercepted and controlled:
//! - **Time**: a virtual clock that only moves when the harness (or a
//!   simulated sleep) advances it
//! - **Randomness**: every subsystem draws from its own ChaCha8 stream
//!   derived from a single 64-bit seed
//! - **Content**: feeds are generated fixtures with creation times baked
//!   into their ids
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   ScenarioRunner                     │
//! │   SimContext (virtual clock, seeded streams)         │
//! │        │                                             │
//! │   ┌────▼──────────────┐     ┌──────────────────────┐ │
//! │   │ EngagementScheduler│───►│ MemoryStore          │ │
//! │   │   tick()           │    │ content/actors/inbox │ │
//! │   └───────────────────┘     └──────────┬───────────┘ │
//! │        invariant checks ◄──────────────┘             │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use pulse_sim::{ScenarioRunner, scenarios::ScenarioId};
//!
//! let result = ScenarioRunner::new(42).with_ticks(50).run(ScenarioId::CoolDown);
//! assert!(result.passed);
//! ```

mod context;
mod error;
mod exporter;
pub mod feed;
mod runner;
pub mod scenarios;

pub use context::{SimContext, DEFAULT_EPOCH_MS};
pub use error::SimError;
pub use exporter::{SimEvent, SimExport, SimFrame};
pub use feed::{FeedFixture, FeedSpec};
pub use runner::{ScenarioMetrics, ScenarioResult, ScenarioRunner, FIXTURE_STREAM, ROSTER_STREAM};
