//! Property tests for the engagement engine.
//!
//! Reactor lists must be pure functions of `(content, offset, count,
//! viewer)`; the scheduler must never lower a like count, never touch
//! fresh content, and never act without an active actor.

use proptest::prelude::*;
use pulse_core::freshness::{self, COOL_DOWN_MS};
use pulse_core::{
    roster, ContentItem, ContentRepository, EngagementConfig, EngagementControl, EngagementScheduler,
    ActorRegistry, MemoryStore, ReactorGenerator,
};
use pulse_sim::feed::default_viewer;
use pulse_sim::SimContext;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

const EPOCH: u64 = 1_700_000_000_000;

fn content_id() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9_]{1,24}",
        (1_000_000_000_000u64..9_999_999_999_999u64, 0u32..1000).prop_map(|(ts, n)| format!("p_{ts}_{n}")),
        "\\PC{0,16}",
    ]
}

fn store_with(content: Vec<ContentItem>, seed: u64) -> Arc<MemoryStore> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Arc::new(MemoryStore::with_data(content, roster::bootstrap_roster(60, &mut rng)))
}

type SimScheduler = EngagementScheduler<SimContext, MemoryStore, MemoryStore, MemoryStore>;

fn scheduler(store: &Arc<MemoryStore>, seed: u64, epoch_ms: u64, config: EngagementConfig) -> SimScheduler {
    let ctx = Arc::new(SimContext::new(seed).with_epoch_ms(epoch_ms));
    let control = EngagementControl::new(config).unwrap();
    EngagementScheduler::new(ctx, store.clone(), store.clone(), store.clone(), control, default_viewer())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn reactor_pages_are_deterministic(
        id in content_id(),
        likes in 0u64..5000,
        liked in any::<bool>(),
        offset in 0u64..200,
        count in 0usize..60,
    ) {
        let viewer = default_viewer();
        let mut content = ContentItem::new(id, "u7", false, likes);
        content.is_liked = liked;

        let a = ReactorGenerator::new().reactors(&content, &viewer, offset, count);
        let b = ReactorGenerator::new().reactors(&content, &viewer, offset, count);
        prop_assert_eq!(&a, &b);

        // Pages are windows of one list
        let wide = ReactorGenerator::new().reactors(&content, &viewer, 0, (offset as usize) + count);
        prop_assert_eq!(&a[..], &wide[offset.min(wide.len() as u64) as usize..]);
    }

    #[test]
    fn reactor_page_length_is_bounded_by_likes(
        id in content_id(),
        likes in 0u64..500,
        offset in 0u64..600,
        count in 0usize..100,
    ) {
        let content = ContentItem::new(id, "u7", false, likes);
        let page = ReactorGenerator::new().reactors(&content, &default_viewer(), offset, count);
        prop_assert_eq!(page.len() as u64, (count as u64).min(likes.saturating_sub(offset)));
    }

    #[test]
    fn viewer_leads_when_they_reacted(id in content_id(), likes in 1u64..300, count in 1usize..40) {
        let viewer = default_viewer();
        let mut content = ContentItem::new(id, "u7", false, likes);
        content.is_liked = true;

        let page = ReactorGenerator::new().reactors(&content, &viewer, 0, count);
        prop_assert_eq!(&page[0], &viewer);
        prop_assert!(page[1..].iter().all(|r| r.id != viewer.id));
    }

    #[test]
    fn reactor_ids_are_unique_within_a_page(id in content_id(), likes in 0u64..300) {
        let content = ContentItem::new(id, "u7", false, likes);
        let page = ReactorGenerator::new().reactors(&content, &default_viewer(), 0, 300);
        let mut ids: Vec<_> = page.iter().map(|r| r.id.clone()).collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), page.len());
    }

    #[test]
    fn freshness_matches_cool_down(
        created in 1_000_000_000_000u64..9_999_999_999_999u64,
        n in 0u32..100,
        now in 0u64..20_000_000_000_000u64,
    ) {
        let id = format!("p_{created}_{n}");
        prop_assert_eq!(freshness::is_fresh(&id, now), now < created + COOL_DOWN_MS);
    }

    #[test]
    fn ids_without_digits_are_never_fresh(id in "[a-z_]{0,20}", now in any::<u64>()) {
        prop_assert!(!freshness::is_fresh(&id, now));
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 24,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn like_counts_never_decrease(seed in any::<u64>(), speed in 0.2f64..5.0, prioritize in any::<bool>()) {
        let content: Vec<ContentItem> = (0..8)
            .map(|i| ContentItem::new(format!("p_1600000000000_{i}"), if i % 3 == 0 { "u1" } else { "u4" }, i % 2 == 0, i * 3))
            .collect();
        let store = store_with(content, seed);
        let config = EngagementConfig { speed_multiplier: speed, prioritize_verified_authors: prioritize };
        let mut sched = scheduler(&store, seed, EPOCH, config);

        let mut previous: Vec<u64> = store.list_content().unwrap().iter().map(|c| c.like_count).collect();
        for _ in 0..20 {
            let report = sched.tick();
            let current: Vec<u64> = store.list_content().unwrap().iter().map(|c| c.like_count).collect();
            prop_assert!(current.iter().zip(&previous).all(|(c, p)| c >= p));
            let delta: u64 = current.iter().sum::<u64>() - previous.iter().sum::<u64>();
            prop_assert_eq!(delta, report.likes as u64);
            previous = current;
        }
    }

    #[test]
    fn batch_size_follows_speed(seed in any::<u64>(), speed in 0.1f64..10.0) {
        let store = store_with(vec![ContentItem::new("p_1600000000000_a", "u4", false, 0)], seed);
        let config = EngagementConfig { speed_multiplier: speed, prioritize_verified_authors: false };
        let mut sched = scheduler(&store, seed, EPOCH, config);
        prop_assert_eq!(sched.tick().draws, (5.0 * speed).ceil() as usize);
    }

    #[test]
    fn inactive_population_changes_nothing(seed in any::<u64>(), ticks in 1usize..30) {
        let content = vec![
            ContentItem::new("p_1600000000000_a", "u1", true, 10),
            ContentItem::new("p_1600000000000_b", "u4", false, 20),
        ];
        let store = store_with(content.clone(), seed);
        store.set_all_active(false).unwrap();
        let mut sched = scheduler(&store, seed, EPOCH, EngagementConfig::at_tier(pulse_core::SpeedTier::Frenzy, true));
        for _ in 0..ticks {
            sched.tick();
        }
        prop_assert_eq!(store.list_content().unwrap(), content);
        prop_assert!(store.all_notifications().is_empty());
        prop_assert!(sched.live_inbox().is_empty());
    }

    #[test]
    fn settled_item_gains_at_most_one_like_per_draw(seed in any::<u64>()) {
        let store = store_with(vec![ContentItem::new("p_1700000000000_x", "u4", true, 10)], seed);
        let mut sched = scheduler(&store, seed, EPOCH + 20_000, EngagementConfig::default());
        sched.tick();
        let likes = store.list_content().unwrap()[0].like_count;
        prop_assert!((10..=15).contains(&likes));
    }

    #[test]
    fn fresh_item_is_untouched(seed in any::<u64>()) {
        let store = store_with(vec![ContentItem::new("p_1700000000000_x", "u1", true, 10)], seed);
        let mut sched = scheduler(&store, seed, EPOCH + 5_000, EngagementConfig::default());
        let report = sched.tick();
        prop_assert_eq!(report.skipped_fresh, 5);
        prop_assert_eq!(store.list_content().unwrap()[0].like_count, 10);
        prop_assert!(store.all_notifications().is_empty());
    }
}
