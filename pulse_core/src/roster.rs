//! Simulated actor population bootstrap.
//!
//! The population is the pre-authored roster (acting as bots under their
//! own names) followed by a large generated crowd `bot_0`, `bot_1`, ...

use rand::Rng;
use tracing::info;

use crate::model::SimulatedActor;
use crate::names::{self, FEMALE_NAMES, LAST_NAMES, MALE_NAMES};
use crate::store::{ActorRegistry, StoreError};

/// Population created for a fresh install.
pub const DEFAULT_POPULATION: usize = 7582;

/// Below this many actors the registry is considered empty and re-seeded.
pub const MIN_HEALTHY_POPULATION: usize = 100;

const ROSTER_AUTO_COMMENT: f64 = 0.40;
const CROWD_AUTO_COMMENT: f64 = 0.10;

/// Builds `total` actors (at least the full pre-authored roster).
pub fn bootstrap_roster<R: Rng + ?Sized>(total: usize, rng: &mut R) -> Vec<SimulatedActor> {
    let roster = names::realistic_roster();
    let mut actors = Vec::with_capacity(total.max(roster.len()));

    for entry in roster {
        let identity = entry.identity;
        actors.push(SimulatedActor {
            id: identity.id.as_str().into(),
            name: identity.name,
            username: identity.username,
            avatar: identity.avatar,
            is_active: true,
            auto_like: true,
            auto_comment: rng.gen_bool(ROSTER_AUTO_COMMENT),
            personality: entry.bio.to_string(),
            target_keywords: String::new(),
            excluded_keywords: String::new(),
            min_interval_secs: 10,
            max_interval_secs: 60,
            total_interactions: 0,
            last_action_ms: Some(0),
        });
    }

    let crowd = total.saturating_sub(actors.len());
    for i in 0..crowd {
        let first = if rng.gen_bool(0.5) {
            MALE_NAMES[rng.gen_range(0..MALE_NAMES.len())]
        } else {
            FEMALE_NAMES[rng.gen_range(0..FEMALE_NAMES.len())]
        };
        let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
        let name = format!("{first} {last}");
        let username = format!(
            "{}_{}_{}",
            names::slug(first),
            names::slug(last),
            rng.gen_range(0..9999)
        );

        actors.push(SimulatedActor {
            id: format!("bot_{i}").into(),
            avatar: names::avatar_url(&name, None),
            name,
            username,
            is_active: true,
            auto_like: true,
            auto_comment: rng.gen_bool(CROWD_AUTO_COMMENT),
            personality: "supportive".to_string(),
            target_keywords: String::new(),
            excluded_keywords: String::new(),
            min_interval_secs: 5,
            max_interval_secs: 300,
            total_interactions: 0,
            last_action_ms: Some(0),
        });
    }

    actors
}

/// Re-seeds the registry when it holds fewer than [`MIN_HEALTHY_POPULATION`]
/// actors. Returns the population size afterwards.
pub fn ensure_population<A, R>(registry: &A, total: usize, rng: &mut R) -> Result<usize, StoreError>
where
    A: ActorRegistry + ?Sized,
    R: Rng + ?Sized,
{
    let existing = registry.list_actors()?.len();
    if existing >= MIN_HEALTHY_POPULATION {
        return Ok(existing);
    }

    let actors = bootstrap_roster(total, rng);
    let n = actors.len();
    registry.replace_actors(actors)?;
    info!("Seeded actor registry: {} actors (had {})", n, existing);
    Ok(n)
}
