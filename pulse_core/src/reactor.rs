//! The Reactor Generator - ephemeral "who reacted" identities.
//!
//! Content only stores a like *count*. When a client lists the people
//! behind that count, the identities are synthesized on demand from the
//! content id and the position in the list:
//!
//! ```text
//! content id ──fold──► seed ──mix(index)──► sub-seed ──► ChaCha8Rng ──► dice
//!                                                                        │
//!        ┌───────────────────────────────────────────────────────────────┘
//!        ▼
//!   reuse pre-authored account?  ──yes──► "{poolId}_{contentId}_{index}"
//!        │ no
//!        ▼
//!   gender → first/last name → handle suffix → verification → followers
//! ```
//!
//! Nothing is cached or stored; the same `(content, index, viewer)` always
//! yields the same identity.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::model::{ContentItem, Identity, Role, VerificationTier};
use crate::names::{self, FEMALE_NAMES, LAST_NAMES, MALE_NAMES};

/// Chance a position reuses one of the pre-authored accounts.
pub const POOL_REUSE_PROBABILITY: f64 = 0.20;

/// Chance a synthesized reactor is verified.
pub const VERIFIED_PROBABILITY: f64 = 0.05;

/// Chance a verified reactor carries the gold tier rather than blue.
pub const GOLD_TIER_PROBABILITY: f64 = 0.02;

/// Upper bound (exclusive) on a synthesized follower count.
pub const MAX_SYNTHETIC_FOLLOWERS: u64 = 5000;

/// Upper bound (exclusive) on the numeric handle suffix.
const HANDLE_SUFFIX_RANGE: u32 = 999;

/// Share of synthesized reactors drawn from the male first-name pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenderSplit {
    male_ratio: f64,
}

impl GenderSplit {
    /// Creates a split; the ratio is clamped to `[0, 1]`.
    pub fn new(male_ratio: f64) -> Self {
        let male_ratio = if male_ratio.is_nan() { 0.5 } else { male_ratio.clamp(0.0, 1.0) };
        Self { male_ratio }
    }

    /// Always picks male names, as the first client release did.
    pub fn legacy() -> Self {
        Self::new(1.0)
    }

    pub fn male_ratio(&self) -> f64 {
        self.male_ratio
    }
}

impl Default for GenderSplit {
    fn default() -> Self {
        Self::new(0.5)
    }
}

/// Folds a content id into a non-negative seed.
///
/// Rolling `h * 31 + unit` over UTF-16 code units, wrapping at 32 bits,
/// then the absolute value (so `i32::MIN` becomes `2^31`).
pub fn content_seed(content_id: &str) -> u64 {
    let mut h: i32 = 0;
    for unit in content_id.encode_utf16() {
        h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit));
    }
    i64::from(h).unsigned_abs()
}

/// SplitMix64 finalizer over `(seed, index)`.
fn sub_seed(seed: u64, index: u64) -> u64 {
    let mut z = seed.wrapping_add(index.wrapping_mul(0x9e3779b97f4a7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Independent rolls for one list position, drawn in a fixed order.
struct Dice {
    reuse: f64,
    pool_index: usize,
    gender: f64,
    first_index: usize,
    last_index: usize,
    suffix: u32,
    verified: f64,
    gold: f64,
    followers: u64,
}

impl Dice {
    fn roll(sub_seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(sub_seed);
        Self {
            reuse: rng.gen(),
            pool_index: rng.gen_range(0..names::realistic_len()),
            gender: rng.gen(),
            // Index into whichever first-name pool the gender roll picks;
            // both pools are the same size.
            first_index: rng.gen_range(0..MALE_NAMES.len().min(FEMALE_NAMES.len())),
            last_index: rng.gen_range(0..LAST_NAMES.len()),
            suffix: rng.gen_range(0..HANDLE_SUFFIX_RANGE),
            verified: rng.gen(),
            gold: rng.gen(),
            followers: rng.gen_range(0..MAX_SYNTHETIC_FOLLOWERS),
        }
    }
}

/// Produces reactor lists for content items.
#[derive(Debug, Clone, Default)]
pub struct ReactorGenerator {
    gender: GenderSplit,
}

impl ReactorGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gender_split(gender: GenderSplit) -> Self {
        Self { gender }
    }

    pub fn gender_split(&self) -> GenderSplit {
        self.gender
    }

    /// Returns up to `count` reactors starting at absolute position `offset`.
    ///
    /// The list is bounded by the item's like count. If the viewer has
    /// reacted, position 0 is the viewer.
    pub fn reactors(
        &self,
        content: &ContentItem,
        viewer: &Identity,
        offset: u64,
        count: usize,
    ) -> Vec<Identity> {
        let available = content.like_count.saturating_sub(offset);
        let len = available.min(count as u64);
        let seed = content_seed(content.id.as_str());

        (offset..offset + len)
            .map(|index| self.reactor_with_seed(content, viewer, seed, index))
            .collect()
    }

    /// The reactor at one absolute position, ignoring the like-count bound.
    pub fn reactor_at(&self, content: &ContentItem, viewer: &Identity, index: u64) -> Identity {
        let seed = content_seed(content.id.as_str());
        self.reactor_with_seed(content, viewer, seed, index)
    }

    fn reactor_with_seed(
        &self,
        content: &ContentItem,
        viewer: &Identity,
        seed: u64,
        index: u64,
    ) -> Identity {
        if index == 0 && content.viewer_has_reacted() {
            return viewer.clone();
        }

        let sub = sub_seed(seed, index);
        let dice = Dice::roll(sub);

        if dice.reuse < POOL_REUSE_PROBABILITY {
            let pooled = names::realistic_identity(dice.pool_index);
            if pooled.id != viewer.id {
                let id = format!("{}_{}_{}", pooled.id, content.id, index);
                return Identity { id: id.into(), ..pooled };
            }
        }

        let first = if dice.gender < self.gender.male_ratio {
            MALE_NAMES[dice.first_index]
        } else {
            FEMALE_NAMES[dice.first_index]
        };
        let last = LAST_NAMES[dice.last_index];
        let name = format!("{first} {last}");
        let username = format!("{}_{}_{}", names::slug(first), names::slug(last), dice.suffix);

        let is_verified = dice.verified < VERIFIED_PROBABILITY;
        let verification_tier = is_verified.then(|| {
            if dice.gold < GOLD_TIER_PROBABILITY {
                VerificationTier::Gold
            } else {
                VerificationTier::Blue
            }
        });

        Identity {
            id: format!("gen_u_{}_{}", content.id, index).into(),
            avatar: names::avatar_url(&name, Some(sub)),
            name,
            username,
            is_verified,
            verification_tier,
            followers: dice.followers,
            role: Role::User,
        }
    }
}
