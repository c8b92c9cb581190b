//! Creation-time extraction from content identifiers.
//!
//! Content ids embed their creation time: strip every non-digit, take the
//! leading 13 digits, read them as epoch milliseconds. Ids that don't
//! carry a timestamp are never considered fresh.

/// Minimum age before simulated engagement may target an item.
pub const COOL_DOWN_MS: u64 = 10_000;

const TIMESTAMP_DIGITS: usize = 13;

/// Epoch milliseconds embedded in `id`, if any.
///
/// Ids with fewer than 13 digits still parse (as a shorter number), which
/// matches how the client stamps and reads its own ids.
pub fn embedded_timestamp_ms(id: &str) -> Option<u64> {
    let digits: String = id
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(TIMESTAMP_DIGITS)
        .collect();
    digits.parse().ok()
}

/// True if `id` was created less than [`COOL_DOWN_MS`] before `now_ms`.
///
/// Timestamps in the future count as fresh.
pub fn is_fresh(id: &str, now_ms: u64) -> bool {
    match embedded_timestamp_ms(id) {
        Some(created) => now_ms < created.saturating_add(COOL_DOWN_MS),
        None => false,
    }
}
