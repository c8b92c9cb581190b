//! Engagement configuration and its live-tunable handle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use thiserror::Error;

/// Actor draws per tick at speed 1.
pub const BASE_BATCH_SIZE: usize = 5;

/// Tick cadence at speed 1.
pub const BASE_INTERVAL: Duration = Duration::from_millis(2000);

/// Chance a drawn actor restricts itself to verified authors (when enabled).
pub const VERIFIED_PREFERENCE: f64 = 0.70;

/// Chance an auto-like actor actually likes its target.
pub const LIKE_PROBABILITY: f64 = 0.50;

/// Chance a like on the viewer's own content produces a notification.
pub const NOTIFY_PROBABILITY: f64 = 0.30;

/// Configuration errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid speed multiplier: {0} (must be finite and > 0)")]
    InvalidSpeed(f64),

    #[error("Unknown speed tier: {0}")]
    UnknownTier(String),
}

/// The discrete speeds offered to operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedTier {
    Normal,
    Fast,
    Frenzy,
}

impl SpeedTier {
    pub fn all() -> [SpeedTier; 3] {
        [SpeedTier::Normal, SpeedTier::Fast, SpeedTier::Frenzy]
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            SpeedTier::Normal => 1.0,
            SpeedTier::Fast => 2.0,
            SpeedTier::Frenzy => 5.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SpeedTier::Normal => "normal",
            SpeedTier::Fast => "fast",
            SpeedTier::Frenzy => "frenzy",
        }
    }
}

impl fmt::Display for SpeedTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SpeedTier {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" | "1" | "1x" => Ok(SpeedTier::Normal),
            "fast" | "2" | "2x" => Ok(SpeedTier::Fast),
            "frenzy" | "insane" | "5" | "5x" => Ok(SpeedTier::Frenzy),
            _ => Err(ConfigError::UnknownTier(s.to_string())),
        }
    }
}

/// Process-wide engagement settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementConfig {
    /// Higher is faster: shorter interval and larger batch.
    pub speed_multiplier: f64,

    /// Bias targeting toward content by verified authors.
    pub prioritize_verified_authors: bool,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            prioritize_verified_authors: true,
        }
    }
}

impl EngagementConfig {
    /// Builds a config at one of the discrete tiers.
    pub fn at_tier(tier: SpeedTier, prioritize_verified_authors: bool) -> Self {
        Self {
            speed_multiplier: tier.multiplier(),
            prioritize_verified_authors,
        }
    }

    /// Actor draws per tick: `ceil(BASE_BATCH_SIZE × speed)`.
    pub fn batch_size(&self) -> usize {
        (BASE_BATCH_SIZE as f64 * self.speed_multiplier).ceil().max(0.0) as usize
    }

    /// Time between ticks: `BASE_INTERVAL / speed`.
    ///
    /// A multiplier that slipped past validation (zero, negative, NaN)
    /// yields `Duration::MAX`, i.e. the loop never ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::try_from_secs_f64(BASE_INTERVAL.as_secs_f64() / self.speed_multiplier)
            .unwrap_or(Duration::MAX)
    }

    /// The tier matching this multiplier, if any.
    pub fn tier(&self) -> Option<SpeedTier> {
        SpeedTier::all()
            .into_iter()
            .find(|t| t.multiplier() == self.speed_multiplier)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.speed_multiplier.is_finite() && self.speed_multiplier > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidSpeed(self.speed_multiplier))
        }
    }
}

/// Shared, live-tunable handle to the [`EngagementConfig`].
///
/// Clones share the same settings. The scheduler takes a fresh
/// [`snapshot`](Self::snapshot) at the start of every tick, so updates
/// apply from the next tick on.
#[derive(Debug, Clone, Default)]
pub struct EngagementControl {
    inner: Arc<RwLock<EngagementConfig>>,
}

impl EngagementControl {
    /// Creates a handle holding `config`.
    pub fn new(config: EngagementConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(RwLock::new(config)),
        })
    }

    /// Copy of the current settings.
    pub fn snapshot(&self) -> EngagementConfig {
        *self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Replaces all settings at once.
    pub fn replace(&self, config: EngagementConfig) -> Result<(), ConfigError> {
        config.validate()?;
        *self.write() = config;
        Ok(())
    }

    pub fn set_speed_tier(&self, tier: SpeedTier) {
        self.write().speed_multiplier = tier.multiplier();
    }

    /// Sets an arbitrary multiplier. Zero, negative and non-finite values
    /// are rejected since the interval divides by it.
    pub fn set_speed_multiplier(&self, multiplier: f64) -> Result<(), ConfigError> {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return Err(ConfigError::InvalidSpeed(multiplier));
        }
        self.write().speed_multiplier = multiplier;
        Ok(())
    }

    pub fn set_prioritize_verified(&self, enabled: bool) {
        self.write().prioritize_verified_authors = enabled;
    }

    /// Flips verified prioritization and returns the new value.
    pub fn toggle_prioritize_verified(&self) -> bool {
        let mut config = self.write();
        config.prioritize_verified_authors = !config.prioritize_verified_authors;
        config.prioritize_verified_authors
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, EngagementConfig> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngagementConfig::default();
        assert_eq!(config.speed_multiplier, 1.0);
        assert!(config.prioritize_verified_authors);
        assert_eq!(config.batch_size(), 5);
        assert_eq!(config.tick_interval(), Duration::from_millis(2000));
        assert_eq!(config.tier(), Some(SpeedTier::Normal));
    }

    #[test]
    fn test_batch_size_scales_with_speed() {
        let config = EngagementConfig { speed_multiplier: 2.0, ..Default::default() };
        assert_eq!(config.batch_size(), 10);
        assert_eq!(config.tick_interval(), Duration::from_millis(1000));

        let config = EngagementConfig::at_tier(SpeedTier::Frenzy, false);
        assert_eq!(config.batch_size(), 25);
        assert_eq!(config.tick_interval(), Duration::from_millis(400));

        let config = EngagementConfig { speed_multiplier: 1.5, ..Default::default() };
        assert_eq!(config.batch_size(), 8);
        assert_eq!(config.tier(), None);
    }

    #[test]
    fn test_control_is_shared() {
        let control = EngagementControl::default();
        let other = control.clone();

        other.set_speed_tier(SpeedTier::Fast);
        assert_eq!(control.snapshot().speed_multiplier, 2.0);

        assert!(!other.toggle_prioritize_verified());
        assert!(!control.snapshot().prioritize_verified_authors);
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        let control = EngagementControl::default();
        assert_eq!(control.set_speed_multiplier(0.0), Err(ConfigError::InvalidSpeed(0.0)));
        assert!(control.set_speed_multiplier(f64::INFINITY).is_err());
        assert!(control
            .replace(EngagementConfig { speed_multiplier: -1.0, prioritize_verified_authors: true })
            .is_err());
        assert_eq!(control.snapshot(), EngagementConfig::default());
        assert!(control.set_speed_multiplier(3.0).is_ok());
        assert_eq!(control.snapshot().batch_size(), 15);
    }

    #[test]
    fn test_speed_tier_parsing() {
        assert_eq!("fast".parse::<SpeedTier>(), Ok(SpeedTier::Fast));
        assert_eq!("5x".parse::<SpeedTier>(), Ok(SpeedTier::Frenzy));
        assert!("warp".parse::<SpeedTier>().is_err());
        assert_eq!(SpeedTier::Normal.to_string(), "normal");
    }

    #[test]
    fn test_config_json() {
        let json = serde_json::to_string(&EngagementConfig::default()).unwrap();
        assert_eq!(json, r#"{"speedMultiplier":1.0,"prioritizeVerifiedAuthors":true}"#);
    }
}
