//! Scenario runner - drives the engagement scheduler on a virtual clock.
//!
//! Every scenario shares one loop: advance the clock by the live tick
//! interval, tick, then check the engine's invariants against the
//! before/after snapshots. Scenario-specific verdicts run at the end.

use crate::context::SimContext;
use crate::error::SimError;
use crate::exporter::{SimEvent, SimExport, SimFrame};
use crate::feed::{FeedFixture, FeedSpec};
use crate::scenarios::ScenarioId;

use pulse_core::freshness::{self, COOL_DOWN_MS};
use pulse_core::store::INBOX_CAPACITY;
use pulse_core::{
    restore_control, roster, AdminConsole, AdminPermissions, ConfigStore, ContentItem, ContentRepository,
    EngagementConfig, EngagementScheduler, Identity, MemoryStore, NotificationSink, ReactorGenerator,
    TickReport,
};
use pulse_env::{ContentId, PulseContext};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// RNG stream for feed generation.
pub const FIXTURE_STREAM: u64 = 0x5eed_0010;

/// RNG stream for the actor population.
pub const ROSTER_STREAM: u64 = 0x5eed_0011;

/// Below this many likes the verified share is too noisy to judge.
const MIN_LIKES_FOR_BIAS: u64 = 50;

/// Results from running a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// Whether scenario passed all assertions
    pub passed: bool,

    /// Total ticks executed
    pub total_ticks: u64,

    /// Final virtual time in seconds
    pub final_time_secs: f64,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Metrics collected during run
    pub metrics: ScenarioMetrics,
}

impl ScenarioResult {
    fn setup_failed(scenario: ScenarioId, seed: u64, reason: String) -> Self {
        Self {
            scenario,
            seed,
            passed: false,
            total_ticks: 0,
            final_time_secs: 0.0,
            failure_reason: Some(reason),
            metrics: ScenarioMetrics::default(),
        }
    }
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScenarioMetrics {
    pub actors: usize,
    pub active_actors: usize,
    pub posts: usize,
    pub draws: u64,
    pub skipped_fresh: u64,
    pub likes: u64,
    /// Likes that landed on verified authors' posts
    pub verified_likes: u64,
    pub notifications: u64,
    pub max_batch: usize,
    /// Durable inbox size at the end
    pub inbox_len: usize,
}

impl ScenarioMetrics {
    fn record(&mut self, report: &TickReport) {
        self.draws += report.draws as u64;
        self.skipped_fresh += report.skipped_fresh as u64;
        self.likes += report.likes as u64;
        self.notifications += report.notifications as u64;
        self.max_batch = self.max_batch.max(report.draws);
    }

    pub fn verified_share(&self) -> f64 {
        self.verified_likes as f64 / self.likes.max(1) as f64
    }
}

/// Keeps the first violation seen.
#[derive(Default)]
struct Verdict {
    failure: Option<String>,
}

impl Verdict {
    fn check(&mut self, ok: bool, reason: impl FnOnce() -> String) -> Option<String> {
        if ok {
            return None;
        }
        let reason = reason();
        if self.failure.is_none() {
            self.failure = Some(reason.clone());
        }
        Some(reason)
    }
}

/// Per-scenario knobs.
struct Setup {
    feed: FeedSpec,
    config: EngagementConfig,
    deactivate: bool,
    ensure_verified: bool,
}

/// Runs engagement scenarios.
pub struct ScenarioRunner {
    /// Configuration seed
    seed: u64,

    /// Ticks per scenario
    ticks: u64,

    /// Overrides the scenario's speed where allowed
    speed: Option<f64>,

    /// Wall-clock milliseconds at virtual time 0
    epoch_ms: u64,

    /// Simulated actors to bootstrap
    population: usize,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ticks: 100,
            speed: None,
            epoch_ms: crate::context::DEFAULT_EPOCH_MS,
            population: 500,
        }
    }

    /// Sets the number of ticks.
    pub fn with_ticks(mut self, ticks: u64) -> Self {
        self.ticks = ticks;
        self
    }

    /// Forces a speed multiplier on scenarios that accept one.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_epoch_ms(mut self, epoch_ms: u64) -> Self {
        self.epoch_ms = epoch_ms;
        self
    }

    pub fn with_population(mut self, population: usize) -> Self {
        self.population = population;
        self
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        self.run_recorded(scenario).0
    }

    /// Runs a scenario and also returns its per-tick frames.
    pub fn run_recorded(&self, scenario: ScenarioId) -> (ScenarioResult, SimExport) {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);

        let mut export = SimExport::new(scenario.name(), self.seed);
        let result = match self.execute(scenario, &mut export) {
            Ok(result) => result,
            Err(e) => {
                error!("Scenario {} could not be set up: {}", scenario.name(), e);
                ScenarioResult::setup_failed(scenario, self.seed, format!("Setup failed: {}", e))
            }
        };
        export.finalize(result.passed, result.failure_reason.clone());
        (result, export)
    }

    fn setup(&self, scenario: ScenarioId) -> Setup {
        let speed = |default: f64| {
            if scenario.accepts_speed_override() {
                self.speed.unwrap_or(default)
            } else {
                default
            }
        };
        let config = |multiplier: f64| EngagementConfig {
            speed_multiplier: multiplier,
            prioritize_verified_authors: true,
        };

        match scenario {
            ScenarioId::SteadyState => Setup {
                feed: FeedSpec::default(),
                config: config(speed(1.0)),
                deactivate: false,
                ensure_verified: false,
            },
            ScenarioId::CoolDown => Setup {
                feed: FeedSpec {
                    posts: 0,
                    fresh_posts: 20,
                    fresh_max_age_ms: 1,
                    ..Default::default()
                },
                config: config(speed(1.0)),
                deactivate: false,
                ensure_verified: false,
            },
            ScenarioId::Dormant => Setup {
                feed: FeedSpec {
                    viewer_share: 0.5,
                    ..Default::default()
                },
                config: config(speed(5.0)),
                deactivate: true,
                ensure_verified: false,
            },
            ScenarioId::Frenzy => Setup {
                feed: FeedSpec::default(),
                config: config(5.0),
                deactivate: false,
                ensure_verified: false,
            },
            ScenarioId::VerifiedBias => Setup {
                feed: FeedSpec {
                    verified_ratio: 0.1,
                    viewer_share: 0.0,
                    ..Default::default()
                },
                config: config(speed(1.0)),
                deactivate: false,
                ensure_verified: true,
            },
            ScenarioId::InboxPressure => Setup {
                feed: FeedSpec {
                    posts: 10,
                    viewer_share: 1.0,
                    ..Default::default()
                },
                config: config(speed(5.0)),
                deactivate: false,
                ensure_verified: false,
            },
        }
    }

    fn execute(&self, scenario: ScenarioId, export: &mut SimExport) -> Result<ScenarioResult, SimError> {
        let setup = self.setup(scenario);
        let ctx = Arc::new(SimContext::new(self.seed).with_epoch_ms(self.epoch_ms));

        let mut feed = FeedFixture::generate(&setup.feed, self.epoch_ms, &mut ctx.derive_rng(FIXTURE_STREAM))?;
        if setup.ensure_verified && feed.verified_count() == 0 {
            if let Some(first) = feed.content.first_mut() {
                first.author_verified = true;
            }
        }
        let verified: HashSet<ContentId> = feed
            .content
            .iter()
            .filter(|c| c.author_verified)
            .map(|c| c.id.clone())
            .collect();

        let store = Arc::new(MemoryStore::with_data(feed.content.clone(), Vec::new()));
        roster::ensure_population(store.as_ref(), self.population, &mut ctx.derive_rng(ROSTER_STREAM))?;

        let control = restore_control(store.as_ref(), setup.config)?;
        let config_store: Arc<dyn ConfigStore> = store.clone();
        let admin = AdminConsole::new(control.clone(), store.clone(), store.clone(), AdminPermissions::full())
            .with_config_store(config_store);
        let mut setup_events = Vec::new();
        if setup.deactivate {
            let n = admin.deactivate_all()?;
            setup_events.push(SimEvent::info(format!("deactivated {} actors", n)));
        }
        let overview = admin.overview()?;

        let mut scheduler = EngagementScheduler::new(
            ctx.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            control.clone(),
            feed.viewer.clone(),
        );

        let mut metrics = ScenarioMetrics {
            actors: overview.total_actors,
            active_actors: overview.active_actors,
            posts: feed.content.len(),
            ..Default::default()
        };
        let any_active = metrics.active_actors > 0;
        let mut verdict = Verdict::default();
        let cool_down_end = self.epoch_ms + COOL_DOWN_MS;
        let mut likes_in_cool_down = 0u64;
        let mut likes_after_cool_down = 0u64;
        let mut ticks_after_cool_down = 0u64;
        let mut total_likes: u64 = feed.content.iter().map(|c| c.like_count).sum();
        let mut last_speed: Option<f64> = None;

        for tick in 1..=self.ticks {
            let config = control.snapshot();
            ctx.advance_time(config.tick_interval());
            let now_ms = ctx.now_ms();

            let before = store.list_content()?;
            let report = scheduler.tick();
            let after = store.list_content()?;
            let inbox = store.notifications_for(&feed.viewer.id)?;

            let mut events = std::mem::take(&mut setup_events);
            if last_speed != Some(config.speed_multiplier) {
                events.push(SimEvent::info(format!(
                    "speed {}x, interval {}ms",
                    config.speed_multiplier,
                    config.tick_interval().as_millis()
                )));
                last_speed = Some(config.speed_multiplier);
            }
            let violations = check_tick(&config, any_active, &before, &after, &report, now_ms);
            for violation in violations {
                if let Some(reason) = verdict.check(false, || format!("tick {}: {}", tick, violation)) {
                    events.push(SimEvent::error(reason));
                }
            }
            if let Some(reason) = verdict.check(
                inbox
                    .iter()
                    .take(report.notifications)
                    .all(|n| notifies_viewer_owner(n.related_content_id.as_ref(), &after, &feed.viewer)),
                || format!("tick {}: notification for content the viewer doesn't own", tick),
            ) {
                events.push(SimEvent::error(reason));
            }

            metrics.record(&report);
            metrics.verified_likes += like_delta(&before, &after, |id| verified.contains(id));
            if now_ms < cool_down_end {
                likes_in_cool_down += report.likes as u64;
            } else {
                likes_after_cool_down += report.likes as u64;
                ticks_after_cool_down += 1;
            }
            total_likes += report.likes as u64;

            export.add_frame(SimFrame {
                tick,
                time_ms: ctx.now().as_millis() as u64,
                speed_multiplier: config.speed_multiplier,
                draws: report.draws,
                skipped_fresh: report.skipped_fresh,
                likes: report.likes,
                notifications: report.notifications,
                total_likes,
                events,
            });

            if tick % 10 == 0 {
                debug!(
                    "  t={:.1}s | likes={} | fresh_skips={} | inbox={}",
                    ctx.now().as_secs_f64(),
                    metrics.likes,
                    metrics.skipped_fresh,
                    inbox.len()
                );
            }
        }

        let inbox = store.notifications_for(&feed.viewer.id)?;
        metrics.inbox_len = inbox.len();
        let final_content = store.list_content()?;
        let config = control.snapshot();

        verdict.check(reactor_pages_stable(&final_content, &feed.viewer), || {
            "reactor pages differ between identical requests".to_string()
        });

        match scenario {
            ScenarioId::SteadyState => {
                verdict.check(self.ticks < 5 || metrics.likes > 0, || {
                    format!("no likes in {} ticks", self.ticks)
                });
            }
            ScenarioId::CoolDown => {
                verdict.check(likes_in_cool_down == 0, || {
                    format!("{} likes landed inside the cool-down window", likes_in_cool_down)
                });
                verdict.check(ticks_after_cool_down < 5 || likes_after_cool_down > 0, || {
                    format!("no likes in {} ticks after the cool-down", ticks_after_cool_down)
                });
            }
            ScenarioId::Dormant => {
                verdict.check(metrics.active_actors == 0, || "actors still active".to_string());
                verdict.check(metrics.draws == 0 && metrics.likes == 0, || {
                    format!("{} draws / {} likes with every actor inactive", metrics.draws, metrics.likes)
                });
                verdict.check(metrics.inbox_len == 0, || {
                    format!("{} notifications with every actor inactive", metrics.inbox_len)
                });
            }
            ScenarioId::Frenzy => {
                verdict.check(config.tick_interval() == Duration::from_millis(400), || {
                    format!("interval {:?} at 5x", config.tick_interval())
                });
                verdict.check(self.ticks == 0 || metrics.max_batch == 25, || {
                    format!("max batch {} at 5x", metrics.max_batch)
                });
            }
            ScenarioId::VerifiedBias => {
                if metrics.likes >= MIN_LIKES_FOR_BIAS {
                    let share = metrics.verified_share();
                    verdict.check(share > 0.55, || {
                        format!("only {:.1}% of likes hit verified authors", share * 100.0)
                    });
                } else {
                    warn!("Too few likes ({}) to judge verified bias", metrics.likes);
                }
            }
            ScenarioId::InboxPressure => {
                let expected = (metrics.notifications as usize).min(INBOX_CAPACITY);
                verdict.check(metrics.inbox_len == expected, || {
                    format!("inbox holds {} (expected {})", metrics.inbox_len, expected)
                });
                verdict.check(
                    inbox.windows(2).all(|w| w[0].timestamp_ms >= w[1].timestamp_ms),
                    || "inbox not newest first".to_string(),
                );
                verdict.check(scheduler.live_inbox().len() <= INBOX_CAPACITY, || {
                    "live inbox exceeds capacity".to_string()
                });
            }
        }

        let passed = verdict.failure.is_none();
        if passed {
            info!(
                "✓ {} complete: {} likes, {} fresh skips, {} notifications",
                scenario.name(),
                metrics.likes,
                metrics.skipped_fresh,
                metrics.notifications
            );
        }

        Ok(ScenarioResult {
            scenario,
            seed: self.seed,
            passed,
            total_ticks: self.ticks,
            final_time_secs: ctx.now().as_secs_f64(),
            failure_reason: verdict.failure,
            metrics,
        })
    }
}

/// Invariants every tick must satisfy.
fn check_tick(
    config: &EngagementConfig,
    any_active: bool,
    before: &[ContentItem],
    after: &[ContentItem],
    report: &TickReport,
    now_ms: u64,
) -> Vec<String> {
    let mut violations = Vec::new();

    let expected_draws = if any_active && !before.is_empty() { config.batch_size() } else { 0 };
    if report.draws != expected_draws {
        violations.push(format!("{} draws, expected {}", report.draws, expected_draws));
    }

    let previous: HashMap<&ContentId, &ContentItem> = before.iter().map(|c| (&c.id, c)).collect();
    for item in after {
        let Some(old) = previous.get(&item.id) else {
            violations.push(format!("unknown item {} appeared", item.id));
            continue;
        };
        if item.like_count < old.like_count {
            violations.push(format!("likes on {} fell {} -> {}", item.id, old.like_count, item.like_count));
        }
        if freshness::is_fresh(item.id.as_str(), now_ms) && item.like_count != old.like_count {
            violations.push(format!("fresh item {} was liked", item.id));
        }
    }

    let delta = like_delta(before, after, |_| true);
    if delta != report.likes as u64 {
        violations.push(format!("like total moved by {}, report says {}", delta, report.likes));
    }

    violations
}

/// Likes gained across items matching `filter`.
fn like_delta(before: &[ContentItem], after: &[ContentItem], filter: impl Fn(&ContentId) -> bool) -> u64 {
    let previous: HashMap<&ContentId, u64> = before.iter().map(|c| (&c.id, c.like_count)).collect();
    after
        .iter()
        .filter(|c| filter(&c.id))
        .map(|c| c.like_count.saturating_sub(previous.get(&c.id).copied().unwrap_or(c.like_count)))
        .sum()
}

fn notifies_viewer_owner(content: Option<&ContentId>, feed: &[ContentItem], viewer: &Identity) -> bool {
    content
        .and_then(|id| feed.iter().find(|c| &c.id == id))
        .is_some_and(|item| item.owner_id == viewer.id)
}

/// Two identical reactor requests must agree and respect the like bound.
fn reactor_pages_stable(content: &[ContentItem], viewer: &Identity) -> bool {
    let generator = ReactorGenerator::new();
    content.iter().take(5).all(|item| {
        let first = generator.reactors(item, viewer, 0, 20);
        let second = generator.reactors(item, viewer, 0, 20);
        first == second && first.len() as u64 == item.like_count.min(20)
    })
}
