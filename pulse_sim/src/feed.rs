//! Deterministic feed fixtures.
//!
//! Content ids follow the client's `p_{createdMs}_{n}` shape so the
//! freshness guard reads real creation times out of them.

use pulse_core::freshness::COOL_DOWN_MS;
use pulse_core::names;
use pulse_core::{ContentItem, Identity, Role, VerificationTier};
use rand::Rng;
use rand_distr::{Distribution, LogNormal};

use crate::error::SimError;

/// Oldest generated post, relative to the fixture epoch.
const MAX_AGE_MS: u64 = 30 * 24 * 3600 * 1000;

/// Youngest post that is already past the cool-down.
const MIN_SETTLED_AGE_MS: u64 = 60_000;

/// Shape of a generated feed.
#[derive(Debug, Clone)]
pub struct FeedSpec {
    /// Posts older than the cool-down.
    pub posts: usize,
    /// Posts created inside the cool-down window.
    pub fresh_posts: usize,
    /// Fresh posts are at most this old (`1` pins them to the epoch).
    pub fresh_max_age_ms: u64,
    /// Chance a non-viewer post has a verified author.
    pub verified_ratio: f64,
    /// Chance a post belongs to the viewer.
    pub viewer_share: f64,
    /// Parameters of the log-normal initial like count.
    pub likes_mu: f64,
    pub likes_sigma: f64,
}

impl Default for FeedSpec {
    fn default() -> Self {
        Self {
            posts: 40,
            fresh_posts: 0,
            fresh_max_age_ms: COOL_DOWN_MS,
            verified_ratio: 0.4,
            viewer_share: 0.25,
            likes_mu: 3.0,
            likes_sigma: 1.2,
        }
    }
}

/// The signed-in user every fixture is viewed by.
pub fn default_viewer() -> Identity {
    Identity::new(
        "u1",
        "Hasan Ramadan",
        "admin",
        names::avatar_url("Hasan Ramadan", None),
    )
    .verified(VerificationTier::Gold)
    .with_role(Role::Admin)
}

/// A viewer plus a content list.
#[derive(Debug, Clone)]
pub struct FeedFixture {
    pub viewer: Identity,
    pub content: Vec<ContentItem>,
}

impl FeedFixture {
    /// Generates a feed as seen at `epoch_ms`.
    pub fn generate<R: Rng + ?Sized>(spec: &FeedSpec, epoch_ms: u64, rng: &mut R) -> Result<Self, SimError> {
        let likes = LogNormal::new(spec.likes_mu, spec.likes_sigma)
            .map_err(|e| SimError::Fixture(format!("Invalid like distribution: {}", e)))?;
        let viewer = default_viewer();

        let total = spec.posts + spec.fresh_posts;
        let mut content = Vec::with_capacity(total);
        for n in 0..total {
            let age_ms = if n < spec.posts {
                rng.gen_range(MIN_SETTLED_AGE_MS..MAX_AGE_MS)
            } else {
                rng.gen_range(0..spec.fresh_max_age_ms.clamp(1, COOL_DOWN_MS))
            };
            let created_ms = epoch_ms.saturating_sub(age_ms);
            let id = format!("p_{}_{}", created_ms, n);

            let mut item = if rng.gen_bool(spec.viewer_share.clamp(0.0, 1.0)) {
                ContentItem::new(id, viewer.id.clone(), viewer.is_verified, 0)
            } else {
                let author = names::realistic_identity(rng.gen_range(0..names::realistic_len()));
                let verified = rng.gen_bool(spec.verified_ratio.clamp(0.0, 1.0));
                ContentItem::new(id, author.id, verified, 0)
            };
            item.like_count = likes.sample(rng).round() as u64;
            content.push(item);
        }

        Ok(Self { viewer, content })
    }

    pub fn verified_count(&self) -> usize {
        self.content.iter().filter(|c| c.author_verified).count()
    }

    pub fn owned_by_viewer(&self) -> usize {
        self.content.iter().filter(|c| c.owner_id == self.viewer.id).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::freshness;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const EPOCH: u64 = 1_704_067_200_000;

    #[test]
    fn test_fixture_is_deterministic() {
        let a = FeedFixture::generate(&FeedSpec::default(), EPOCH, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        let b = FeedFixture::generate(&FeedSpec::default(), EPOCH, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        assert_eq!(a.content, b.content);
    }

    #[test]
    fn test_fresh_and_settled_posts() {
        let spec = FeedSpec {
            posts: 30,
            fresh_posts: 10,
            ..Default::default()
        };
        let feed = FeedFixture::generate(&spec, EPOCH, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        assert_eq!(feed.content.len(), 40);

        let fresh = feed
            .content
            .iter()
            .filter(|c| freshness::is_fresh(c.id.as_str(), EPOCH))
            .count();
        assert_eq!(fresh, 10);
        assert!(feed.content[30..].iter().all(|c| freshness::is_fresh(c.id.as_str(), EPOCH)));
    }

    #[test]
    fn test_shares_are_respected() {
        let spec = FeedSpec {
            posts: 400,
            viewer_share: 1.0,
            ..Default::default()
        };
        let feed = FeedFixture::generate(&spec, EPOCH, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        assert_eq!(feed.owned_by_viewer(), 400);

        let spec = FeedSpec {
            posts: 400,
            viewer_share: 0.0,
            verified_ratio: 0.0,
            ..Default::default()
        };
        let feed = FeedFixture::generate(&spec, EPOCH, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        assert_eq!(feed.owned_by_viewer(), 0);
        assert_eq!(feed.verified_count(), 0);
    }

    #[test]
    fn test_invalid_distribution() {
        let spec = FeedSpec {
            likes_sigma: -1.0,
            ..Default::default()
        };
        let result = FeedFixture::generate(&spec, EPOCH, &mut ChaCha8Rng::seed_from_u64(1));
        assert!(matches!(result, Err(SimError::Fixture(_))));
    }
}
