//! Core environment context trait for the engagement engine.

use async_trait::async_trait;
use rand_chacha::ChaCha8Rng;
use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::task::JoinHandle;

/// The central interface for Environment Interaction.
///
/// This trait abstracts the "real world" so that the scheduler can run
/// against a real clock or a virtual one.
///
/// # Implementations
///
/// - **Production**: `TokioContext` - wraps `tokio::time`, OS entropy
/// - **Simulation**: `SimContext` (in `pulse_sim`) - virtual clock, `ChaCha8Rng(seed)`
///
/// # Determinism
///
/// For simulation runs, all methods that would normally introduce
/// non-determinism (time, randomness) are controlled by the implementation.
#[async_trait]
pub trait PulseContext: Send + Sync + 'static {
    /// Returns the current monotonic time since context creation.
    fn now(&self) -> Duration;
    
    /// Returns the wall-clock time.
    ///
    /// Content identifiers embed creation time in epoch milliseconds, so the
    /// freshness guard compares against this clock, not `now()`.
    fn system_time(&self) -> SystemTime;
    
    /// Wall-clock time as epoch milliseconds (0 if the clock is before the epoch).
    fn now_ms(&self) -> u64 {
        self.system_time()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
    
    /// Suspends execution for the given duration.
    ///
    /// In production: wraps `tokio::time::sleep`
    /// In simulation: advances virtual clock
    async fn sleep(&self, duration: Duration);
    
    /// Spawns a background task and returns its handle.
    fn spawn<F>(&self, name: &str, future: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static;
    
    /// Returns an RNG for the given stream.
    ///
    /// Distinct subsystems ask for distinct streams so that adding draws in
    /// one never perturbs another. In simulation the result is a pure
    /// function of `(seed, stream)`.
    fn derive_rng(&self, stream: u64) -> ChaCha8Rng;
    
    /// Returns the context's seed (for logging/debugging).
    ///
    /// In production, returns 0 (not seeded).
    fn seed(&self) -> u64;
}
