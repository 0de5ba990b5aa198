//! Randomized stage durations.

use std::time::Duration;

use rand::Rng;

/// Inclusive `(min, max)` milliseconds for `base_ms` varied by ± `variation_percent`,
/// or `None` if the upper bound does not fit in a `u64`.
///
/// `variation_percent` is clamped to 100 so the lower bound never underflows.
#[must_use]
pub const fn checked_variation_bounds_ms(base_ms: u64, variation_percent: u32) -> Option<(u64, u64)> {
    let spread = spread_ms(base_ms, variation_percent);
    match base_ms.checked_add(spread) {
        Some(max) => Some((base_ms - spread, max)),
        None => None,
    }
}

/// Like [`checked_variation_bounds_ms`], saturating the upper bound at `u64::MAX`.
#[must_use]
pub const fn variation_bounds_ms(base_ms: u64, variation_percent: u32) -> (u64, u64) {
    match checked_variation_bounds_ms(base_ms, variation_percent) {
        Some(bounds) => bounds,
        None => (base_ms - spread_ms(base_ms, variation_percent), u64::MAX),
    }
}

/// `base_ms * percent / 100` rounded down, with `percent` clamped to 100.
const fn spread_ms(base_ms: u64, variation_percent: u32) -> u64 {
    let percent = if variation_percent > 100 { 100 } else { variation_percent as u64 };
    // Split so neither product can overflow; the result never exceeds base_ms.
    (base_ms / 100) * percent + (base_ms % 100) * percent / 100
}

/// Uniformly random duration within [`variation_bounds_ms`].
pub fn with_variation<R: Rng + ?Sized>(base_ms: u64, variation_percent: u32, rng: &mut R) -> Duration {
    let (min, max) = variation_bounds_ms(base_ms, variation_percent);
    Duration::from_millis(rng.random_range(min..=max))
}

/// [`with_variation`] using the thread-local generator.
#[must_use]
pub fn jittered(base_ms: u64, variation_percent: u32) -> Duration {
    with_variation(base_ms, variation_percent, &mut rand::rng())
}
