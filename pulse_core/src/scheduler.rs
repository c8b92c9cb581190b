//! The Engagement Scheduler - one batch of simulated engagement per tick.
//!
//! # Tick procedure
//!
//! ```text
//! snapshot config ─► list actors ─► keep active ─► (none? no-op)
//!                          │
//!                          ▼
//!        draw batch_size actors uniformly, WITH replacement
//!                          │
//!            ┌─────────────┴──────────────┐ for each draw
//!            ▼                            │
//!   pick target (70% verified pool        │
//!   when prioritizing, else any)          │
//!            │                            │
//!   fresh (< 10 s old)? ── yes ─► skip ───┤
//!            │ no                         │
//!   auto-like && 50% ── no ─► skip ───────┤
//!            │ yes                        │
//!   like delta += 1, actor delta += 1     │
//!   owner == viewer && 30% ─► notify      │
//!            └────────────────────────────┘
//!                          │
//!   any likes? ─► apply_like_deltas (one write), record_interactions (one write)
//! ```
//!
//! Selection works on the snapshot, but only deltas are committed: the
//! store adds them to whatever it holds at commit time, so a deactivation,
//! boost or reaction made while the tick ran is kept.
//!
//! A tick never fails: store errors are logged and the tick degrades to
//! whatever work could be done.

use pulse_env::{ActorId, ContentId, NotificationId, PulseContext};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use crate::config::{EngagementConfig, EngagementControl, LIKE_PROBABILITY, NOTIFY_PROBABILITY, VERIFIED_PREFERENCE};
use crate::freshness;
use crate::model::{ContentItem, Identity, Notification};
use crate::store::{self, ActorRegistry, ContentRepository, InteractionDelta, NotificationSink};

/// RNG stream reserved for the scheduler.
pub const SCHEDULER_STREAM: u64 = 0x5eed_0001;

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// Actor draws performed (0 when no actor was active).
    pub draws: usize,
    /// Draws whose target was still inside the cool-down window.
    pub skipped_fresh: usize,
    /// Likes applied.
    pub likes: usize,
    /// Notifications emitted to the viewer.
    pub notifications: usize,
    /// Like deltas were committed this tick.
    pub committed: bool,
}

/// Totals across ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngagementStats {
    pub ticks: u64,
    /// Ticks that did nothing because no actor was active or no content existed.
    pub idle_ticks: u64,
    pub draws: u64,
    pub skipped_fresh: u64,
    pub likes: u64,
    pub notifications: u64,
    pub commits: u64,
}

impl EngagementStats {
    fn record(&mut self, report: &TickReport) {
        self.ticks += 1;
        if report.draws == 0 {
            self.idle_ticks += 1;
        }
        self.draws += report.draws as u64;
        self.skipped_fresh += report.skipped_fresh as u64;
        self.likes += report.likes as u64;
        self.notifications += report.notifications as u64;
        if report.committed {
            self.commits += 1;
        }
    }
}

/// The viewer's live notification list (newest first).
///
/// Shared between the scheduler and whatever displays notifications.
#[derive(Debug, Clone, Default)]
pub struct LiveInbox {
    inner: Arc<Mutex<Vec<Notification>>>,
}

impl LiveInbox {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, notification: Notification) {
        store::push_newest(&mut self.lock(), notification);
    }

    /// Copy of the list, newest first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Marks everything read; returns how many changed.
    pub fn mark_all_read(&self) -> usize {
        let mut inbox = self.lock();
        let mut changed = 0;
        for n in inbox.iter_mut().filter(|n| !n.is_read) {
            n.is_read = true;
            changed += 1;
        }
        changed
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Simulates organic engagement from the actor population onto content.
///
/// Generic over the context and each collaborator so the same scheduler
/// runs against tokio or a virtual clock, and against memory or sled.
pub struct EngagementScheduler<Ctx, C, A, N>
where
    Ctx: PulseContext,
    C: ContentRepository + ?Sized,
    A: ActorRegistry + ?Sized,
    N: NotificationSink + ?Sized,
{
    pub(crate) context: Arc<Ctx>,
    content: Arc<C>,
    actors: Arc<A>,
    sink: Arc<N>,
    pub(crate) control: EngagementControl,
    /// The signed-in user notifications are addressed to.
    viewer: Identity,
    rng: ChaCha8Rng,
    live: LiveInbox,
    stats: EngagementStats,
}

impl<Ctx, C, A, N> EngagementScheduler<Ctx, C, A, N>
where
    Ctx: PulseContext,
    C: ContentRepository + ?Sized,
    A: ActorRegistry + ?Sized,
    N: NotificationSink + ?Sized,
{
    pub fn new(
        context: Arc<Ctx>,
        content: Arc<C>,
        actors: Arc<A>,
        sink: Arc<N>,
        control: EngagementControl,
        viewer: Identity,
    ) -> Self {
        let rng = context.derive_rng(SCHEDULER_STREAM);
        Self {
            context,
            content,
            actors,
            sink,
            control,
            viewer,
            rng,
            live: LiveInbox::new(),
            stats: EngagementStats::default(),
        }
    }

    /// Uses an existing live list instead of a fresh one.
    pub fn with_live_inbox(mut self, live: LiveInbox) -> Self {
        self.live = live;
        self
    }

    pub fn viewer(&self) -> &Identity {
        &self.viewer
    }

    pub fn control(&self) -> &EngagementControl {
        &self.control
    }

    pub fn live_inbox(&self) -> LiveInbox {
        self.live.clone()
    }

    pub fn stats(&self) -> &EngagementStats {
        &self.stats
    }

    /// Runs one tick against the latest collections.
    pub fn tick(&mut self) -> TickReport {
        let config = self.control.snapshot();
        let report = self.run_batch(&config);
        self.stats.record(&report);
        debug!(
            "tick {} | draws={} fresh={} likes={} notified={}",
            self.stats.ticks, report.draws, report.skipped_fresh, report.likes, report.notifications
        );
        report
    }

    fn run_batch(&mut self, config: &EngagementConfig) -> TickReport {
        let mut report = TickReport::default();
        let now_ms = self.context.now_ms();

        let actors = match self.actors.list_actors() {
            Ok(actors) => actors,
            Err(e) => {
                warn!("Skipping tick, actor registry unavailable: {}", e);
                return report;
            }
        };
        let active: Vec<usize> = actors
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_active)
            .map(|(i, _)| i)
            .collect();
        if active.is_empty() {
            return report;
        }

        let content = match self.content.list_content() {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping tick, content repository unavailable: {}", e);
                return report;
            }
        };
        if content.is_empty() {
            return report;
        }
        let verified: Vec<usize> = content
            .iter()
            .enumerate()
            .filter(|(_, item)| item.author_verified)
            .map(|(i, _)| i)
            .collect();

        let mut like_deltas: HashMap<ContentId, u64> = HashMap::new();
        let mut actor_deltas: HashMap<ActorId, InteractionDelta> = HashMap::new();

        for _ in 0..config.batch_size() {
            let actor = &actors[active[self.rng.gen_range(0..active.len())]];
            report.draws += 1;

            let target = self.pick_target(config, &content, &verified);
            let item = &content[target];
            if freshness::is_fresh(item.id.as_str(), now_ms) {
                report.skipped_fresh += 1;
                continue;
            }

            if !(actor.auto_like && self.rng.gen_bool(LIKE_PROBABILITY)) {
                continue;
            }

            *like_deltas.entry(item.id.clone()).or_default() += 1;
            actor_deltas.entry(actor.id.clone()).or_default().record(now_ms);
            report.likes += 1;

            if item.owner_id == self.viewer.id && self.rng.gen_bool(NOTIFY_PROBABILITY) {
                let notification = Notification::like(
                    NotificationId::from_rng(&mut self.rng),
                    self.viewer.id.clone(),
                    actor.identity(),
                    item.id.clone(),
                    now_ms,
                );
                self.live.push(notification.clone());
                if let Err(e) = self.sink.append(notification) {
                    warn!("Notification not persisted: {}", e);
                }
                report.notifications += 1;
            }
        }

        if report.likes > 0 {
            match self.content.apply_like_deltas(&like_deltas) {
                Ok(applied) => {
                    report.committed = true;
                    if applied < report.likes as u64 {
                        debug!("{} likes dropped, content removed mid-tick", report.likes as u64 - applied);
                    }
                }
                Err(e) => warn!("Dropping {} likes, content commit failed: {}", report.likes, e),
            }
            if let Err(e) = self.actors.record_interactions(&actor_deltas) {
                warn!("Actor counters not persisted: {}", e);
            }
        }

        report
    }

    /// Index of the target for one draw.
    fn pick_target(&mut self, config: &EngagementConfig, content: &[ContentItem], verified: &[usize]) -> usize {
        if config.prioritize_verified_authors
            && !verified.is_empty()
            && self.rng.gen_bool(VERIFIED_PREFERENCE)
        {
            return verified[self.rng.gen_range(0..verified.len())];
        }
        self.rng.gen_range(0..content.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SimulatedActor;
    use crate::roster;
    use crate::store::{MemoryStore, StoreError};
    use crate::testing::ManualContext;
    use pulse_env::{ContentId, UserId};
    use rand::SeedableRng;

    const EPOCH: u64 = 1_700_000_000_000;

    fn viewer() -> Identity {
        Identity::new("u1", "Hasan Ramadan", "admin", "https://example.invalid/me.png")
    }

    fn actors(n: usize) -> Vec<SimulatedActor> {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut all = roster::bootstrap_roster(n.max(19), &mut rng);
        all.truncate(n);
        all
    }

    type Sched = EngagementScheduler<ManualContext, MemoryStore, MemoryStore, MemoryStore>;

    fn scheduler(store: &Arc<MemoryStore>, now_ms: u64, config: EngagementConfig, seed: u64) -> Sched {
        let ctx = Arc::new(ManualContext::new(seed, now_ms));
        let control = EngagementControl::new(config).unwrap();
        EngagementScheduler::new(ctx, store.clone(), store.clone(), store.clone(), control, viewer())
    }

    fn likes(store: &MemoryStore, id: &str) -> u64 {
        store
            .list_content()
            .unwrap()
            .into_iter()
            .find(|c| c.id.as_str() == id)
            .map(|c| c.like_count)
            .unwrap()
    }

    #[test]
    fn test_batch_size_draws() {
        let store = Arc::new(MemoryStore::with_data(
            vec![ContentItem::new("p_1600000000000_a", "u9", false, 0)],
            actors(3),
        ));
        let config = EngagementConfig { speed_multiplier: 2.0, prioritize_verified_authors: false };
        let mut sched = scheduler(&store, EPOCH, config, 1);
        assert_eq!(sched.tick().draws, 10);
    }

    #[test]
    fn test_scenario_past_cool_down() {
        for seed in 0..50 {
            let store = Arc::new(MemoryStore::with_data(
                vec![ContentItem::new("p_1700000000000_x", "u9", true, 10)],
                actors(3),
            ));
            let mut sched = scheduler(&store, EPOCH + 20_000, EngagementConfig::default(), seed);
            let report = sched.tick();
            assert_eq!(report.draws, 5);
            assert_eq!(report.skipped_fresh, 0);
            let after = likes(&store, "p_1700000000000_x");
            assert!((10..=15).contains(&after), "seed {seed}: {after}");
            assert_eq!(after - 10, report.likes as u64);
        }
    }

    #[test]
    fn test_scenario_inside_cool_down() {
        for seed in 0..50 {
            let store = Arc::new(MemoryStore::with_data(
                vec![ContentItem::new("p_1700000000000_x", "u1", true, 10)],
                actors(3),
            ));
            let mut sched = scheduler(&store, EPOCH + 5_000, EngagementConfig::default(), seed);
            let report = sched.tick();
            assert_eq!(report.skipped_fresh, 5);
            assert_eq!(report.likes, 0);
            assert!(!report.committed);
            assert_eq!(likes(&store, "p_1700000000000_x"), 10);
            assert!(store.all_notifications().is_empty());
        }
    }

    #[test]
    fn test_unparsable_ids_are_never_fresh() {
        let store = Arc::new(MemoryStore::with_data(
            vec![ContentItem::new("p_locked", "u9", false, 0)],
            actors(5),
        ));
        let config = EngagementConfig { speed_multiplier: 5.0, prioritize_verified_authors: false };
        let mut sched = scheduler(&store, EPOCH, config, 4);
        let report = sched.tick();
        assert_eq!(report.skipped_fresh, 0);
        assert!(report.likes > 0);
    }

    #[test]
    fn test_inactive_actors_never_act() {
        let store = Arc::new(MemoryStore::with_data(
            vec![
                ContentItem::new("p_1600000000000_a", "u1", true, 3),
                ContentItem::new("p_1600000000000_b", "u1", false, 4),
            ],
            actors(40),
        ));
        store.set_all_active(false).unwrap();
        let mut sched = scheduler(&store, EPOCH, EngagementConfig::at_tier(crate::config::SpeedTier::Frenzy, true), 9);
        for _ in 0..100 {
            assert_eq!(sched.tick(), TickReport::default());
        }
        assert_eq!(likes(&store, "p_1600000000000_a"), 3);
        assert_eq!(likes(&store, "p_1600000000000_b"), 4);
        assert!(store.all_notifications().is_empty());
        assert!(sched.live_inbox().is_empty());
        assert_eq!(sched.stats().idle_ticks, 100);
    }

    #[test]
    fn test_only_active_actors_are_drawn() {
        let mut pool = actors(20);
        for actor in pool.iter_mut().skip(1) {
            actor.is_active = false;
        }
        let only = pool[0].id.clone();
        let store = Arc::new(MemoryStore::with_data(
            vec![ContentItem::new("p_1600000000000_a", "u9", false, 0)],
            pool,
        ));
        let mut sched = scheduler(&store, EPOCH, EngagementConfig::default(), 5);
        for _ in 0..20 {
            sched.tick();
        }
        let acted: Vec<_> = store
            .list_actors()
            .unwrap()
            .into_iter()
            .filter(|a| a.total_interactions > 0)
            .map(|a| a.id)
            .collect();
        assert_eq!(acted, vec![only]);
    }

    #[test]
    fn test_likes_are_monotonic_and_counted() {
        let store = Arc::new(MemoryStore::with_data(
            vec![
                ContentItem::new("p_1600000000000_a", "u1", true, 0),
                ContentItem::new("p_1600000000000_b", "u2", false, 100),
                ContentItem::new("p_1600000000000_c", "u3", true, 7),
            ],
            actors(50),
        ));
        let mut sched = scheduler(&store, EPOCH, EngagementConfig::default(), 21);
        let mut previous: Vec<u64> = store.list_content().unwrap().iter().map(|c| c.like_count).collect();
        let start_total: u64 = previous.iter().sum();
        for _ in 0..200 {
            sched.tick();
            let current: Vec<u64> = store.list_content().unwrap().iter().map(|c| c.like_count).collect();
            assert!(current.iter().zip(&previous).all(|(c, p)| c >= p));
            previous = current;
        }
        let end_total: u64 = previous.iter().sum();
        assert_eq!(end_total - start_total, sched.stats().likes);

        let interactions: u64 = store.list_actors().unwrap().iter().map(|a| a.total_interactions).sum();
        assert_eq!(interactions, sched.stats().likes);
    }

    #[test]
    fn test_notifications_only_for_viewer_content() {
        let store = Arc::new(MemoryStore::with_data(
            vec![
                ContentItem::new("p_1600000000000_mine", "u1", false, 0),
                ContentItem::new("p_1600000000000_theirs", "u2", false, 0),
            ],
            actors(30),
        ));
        let config = EngagementConfig { speed_multiplier: 5.0, prioritize_verified_authors: false };
        let mut sched = scheduler(&store, EPOCH, config, 77);
        for _ in 0..100 {
            sched.tick();
        }

        let inbox = store.all_notifications();
        assert!(!inbox.is_empty());
        assert!(inbox.iter().all(|n| n.target_user_id == UserId::from("u1")));
        assert!(inbox
            .iter()
            .all(|n| n.related_content_id == Some(ContentId::from("p_1600000000000_mine"))));
        assert!(inbox.iter().all(|n| !n.is_read && n.sender.role == crate::model::Role::Bot));

        // Roughly 30% of likes on the viewer's post notify
        let mine = likes(&store, "p_1600000000000_mine") as f64;
        let ratio = sched.stats().notifications as f64 / mine;
        assert!((0.2..0.4).contains(&ratio), "ratio {ratio}");
        assert_eq!(sched.live_inbox().len(), inbox.len().min(store::INBOX_CAPACITY));
    }

    #[test]
    fn test_verified_preference() {
        let mut content = vec![ContentItem::new("p_1600000000000_v", "u2", true, 0)];
        for i in 0..9 {
            content.push(ContentItem::new(format!("p_1600000000000_{i}"), "u3", false, 0));
        }
        let store = Arc::new(MemoryStore::with_data(content, actors(30)));
        let config = EngagementConfig { speed_multiplier: 5.0, prioritize_verified_authors: true };
        let mut sched = scheduler(&store, EPOCH, config, 3);
        for _ in 0..200 {
            sched.tick();
        }
        // Expected share on the single verified post: 0.7 + 0.3 / 10 = 0.73
        let verified = likes(&store, "p_1600000000000_v") as f64;
        let share = verified / sched.stats().likes as f64;
        assert!((0.65..0.81).contains(&share), "share {share}");
    }

    #[test]
    fn test_config_changes_apply_next_tick() {
        let store = Arc::new(MemoryStore::with_data(
            vec![ContentItem::new("p_1600000000000_a", "u9", false, 0)],
            actors(3),
        ));
        let mut sched = scheduler(&store, EPOCH, EngagementConfig::default(), 2);
        assert_eq!(sched.tick().draws, 5);
        sched.control().set_speed_tier(crate::config::SpeedTier::Frenzy);
        assert_eq!(sched.tick().draws, 25);
    }

    #[test]
    fn test_reads_latest_content_each_tick() {
        let store = Arc::new(MemoryStore::with_data(
            vec![ContentItem::new("p_1600000000000_a", "u9", false, 0)],
            actors(10),
        ));
        let mut sched = scheduler(&store, EPOCH, EngagementConfig::default(), 8);
        sched.tick();

        // A real-user edit between ticks is preserved
        let mut items = store.list_content().unwrap();
        items[0].like_count += 1000;
        items[0].is_liked = true;
        let before = items[0].like_count;
        store.replace_content(items).unwrap();

        sched.tick();
        let after = store.list_content().unwrap();
        assert!(after[0].like_count >= before);
        assert!(after[0].is_liked);
    }

    type Edit = Box<dyn FnOnce(&MemoryStore) + Send>;

    /// Runs an edit on the store right after the first snapshot is read,
    /// the way an operator or viewer would while a tick is in flight.
    struct EditDuringTick {
        inner: Arc<MemoryStore>,
        after_content: Mutex<Option<Edit>>,
        after_actors: Mutex<Option<Edit>>,
    }

    impl EditDuringTick {
        fn new(inner: &Arc<MemoryStore>) -> Self {
            Self {
                inner: inner.clone(),
                after_content: Mutex::new(None),
                after_actors: Mutex::new(None),
            }
        }

        fn after_content(self, edit: impl FnOnce(&MemoryStore) + Send + 'static) -> Self {
            *self.after_content.lock().unwrap() = Some(Box::new(edit));
            self
        }

        fn after_actors(self, edit: impl FnOnce(&MemoryStore) + Send + 'static) -> Self {
            *self.after_actors.lock().unwrap() = Some(Box::new(edit));
            self
        }

        fn fire(&self, hook: &Mutex<Option<Edit>>) {
            if let Some(edit) = hook.lock().unwrap().take() {
                edit(&self.inner);
            }
        }
    }

    impl ContentRepository for EditDuringTick {
        fn list_content(&self) -> Result<Vec<ContentItem>, StoreError> {
            let items = self.inner.list_content()?;
            self.fire(&self.after_content);
            Ok(items)
        }

        fn replace_content(&self, items: Vec<ContentItem>) -> Result<(), StoreError> {
            self.inner.replace_content(items)
        }

        fn apply_like_deltas(&self, deltas: &HashMap<ContentId, u64>) -> Result<u64, StoreError> {
            self.inner.apply_like_deltas(deltas)
        }
    }

    impl ActorRegistry for EditDuringTick {
        fn list_actors(&self) -> Result<Vec<SimulatedActor>, StoreError> {
            let actors = self.inner.list_actors()?;
            self.fire(&self.after_actors);
            Ok(actors)
        }

        fn replace_actors(&self, actors: Vec<SimulatedActor>) -> Result<(), StoreError> {
            self.inner.replace_actors(actors)
        }

        fn record_interactions(&self, deltas: &HashMap<ActorId, InteractionDelta>) -> Result<usize, StoreError> {
            self.inner.record_interactions(deltas)
        }
    }

    #[test]
    fn test_deactivation_during_tick_sticks() {
        let store = Arc::new(MemoryStore::with_data(
            vec![ContentItem::new("p_1600000000000_a", "u9", false, 0)],
            actors(30),
        ));
        let registry = Arc::new(EditDuringTick::new(&store).after_actors(|s| {
            s.set_all_active(false).unwrap();
        }));
        let config = EngagementConfig { speed_multiplier: 5.0, prioritize_verified_authors: false };
        let mut sched = EngagementScheduler::new(
            Arc::new(ManualContext::new(6, EPOCH)),
            store.clone(),
            registry,
            store.clone(),
            EngagementControl::new(config).unwrap(),
            viewer(),
        );

        // The in-flight tick still acts on its snapshot
        let report = sched.tick();
        assert!(report.likes > 0);

        let after = store.list_actors().unwrap();
        assert_eq!(after.iter().filter(|a| a.is_active).count(), 0);
        let interactions: u64 = after.iter().map(|a| a.total_interactions).sum();
        assert_eq!(interactions, report.likes as u64);

        assert_eq!(sched.tick(), TickReport::default());
        assert_eq!(likes(&store, "p_1600000000000_a"), report.likes as u64);
    }

    #[test]
    fn test_boost_and_reaction_during_tick_survive() {
        let store = Arc::new(MemoryStore::with_data(
            vec![ContentItem::new("p_1600000000000_a", "u9", false, 10)],
            actors(30),
        ));
        let content = Arc::new(EditDuringTick::new(&store).after_content(|s| {
            s.boost_likes(&ContentId::from("p_1600000000000_a"), 1000).unwrap();
            let mut items = s.list_content().unwrap();
            items[0].is_liked = true;
            s.replace_content(items).unwrap();
        }));
        let config = EngagementConfig { speed_multiplier: 5.0, prioritize_verified_authors: false };
        let mut sched = EngagementScheduler::new(
            Arc::new(ManualContext::new(12, EPOCH)),
            content,
            store.clone(),
            store.clone(),
            EngagementControl::new(config).unwrap(),
            viewer(),
        );

        let report = sched.tick();
        assert!(report.likes > 0);
        assert!(report.committed);

        let item = &store.list_content().unwrap()[0];
        assert_eq!(item.like_count, 10 + 1000 + report.likes as u64);
        assert!(item.is_liked);
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let run = |seed| {
            let store = Arc::new(MemoryStore::with_data(
                vec![
                    ContentItem::new("p_1600000000000_a", "u1", true, 0),
                    ContentItem::new("p_1600000000000_b", "u2", false, 0),
                ],
                actors(25),
            ));
            let mut sched = scheduler(&store, EPOCH, EngagementConfig::default(), seed);
            for _ in 0..30 {
                sched.tick();
            }
            (store.list_content().unwrap(), store.all_notifications())
        };
        assert_eq!(run(99), run(99));
    }

    struct BrokenRegistry;

    impl ActorRegistry for BrokenRegistry {
        fn list_actors(&self) -> Result<Vec<SimulatedActor>, StoreError> {
            Err(StoreError::Backend("offline".into()))
        }

        fn replace_actors(&self, _actors: Vec<SimulatedActor>) -> Result<(), StoreError> {
            Err(StoreError::Backend("offline".into()))
        }

        fn record_interactions(&self, _deltas: &HashMap<ActorId, InteractionDelta>) -> Result<usize, StoreError> {
            Err(StoreError::Backend("offline".into()))
        }
    }

    #[test]
    fn test_store_failure_is_a_no_op() {
        let store = Arc::new(MemoryStore::with_data(
            vec![ContentItem::new("p_1600000000000_a", "u9", false, 0)],
            vec![],
        ));
        let ctx = Arc::new(ManualContext::new(1, EPOCH));
        let mut sched = EngagementScheduler::new(
            ctx,
            store.clone(),
            Arc::new(BrokenRegistry),
            store.clone(),
            EngagementControl::default(),
            viewer(),
        );
        assert_eq!(sched.tick(), TickReport::default());
        assert_eq!(sched.stats().ticks, 1);
    }

    #[test]
    fn test_empty_content_is_a_no_op() {
        let store = Arc::new(MemoryStore::with_data(vec![], actors(5)));
        let mut sched = scheduler(&store, EPOCH, EngagementConfig::default(), 1);
        assert_eq!(sched.tick(), TickReport::default());
    }
}
