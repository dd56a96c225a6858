//! Common time and easing helpers for lift_core.

use std::time::Duration;

/// Duration as whole milliseconds, saturating at `u64::MAX`.
#[inline]
pub fn as_millis_u64(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Fraction of `total_ms` covered by `elapsed_ms`, clamped to [0, 1].
/// A zero-length span counts as already complete.
#[inline]
pub fn fraction(elapsed_ms: u64, total_ms: u64) -> f64 {
    if total_ms == 0 {
        return 1.0;
    }
    (elapsed_ms as f64 / total_ms as f64).clamp(0.0, 1.0)
}

/// Quadratic ease-out: fast start, gentle finish. Input is clamped to [0, 1].
#[inline]
pub fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in: gentle start, fast finish. Input is clamped to [0, 1].
#[inline]
pub fn ease_in(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-in-out, for cosmetic travel progress only.
#[inline]
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - 2.0 * (1.0 - t) * (1.0 - t)
    }
}
