//! Fixed car geometry and timing.
//!
//! These are deliberately not part of the runtime configuration; they are
//! exposed so tests can reason about exact tick counts.

use std::time::Duration;

/// Number of floors served (floors are numbered `1..=FLOORS`).
pub const FLOORS: u8 = 6;
/// Lowest floor.
pub const BOTTOM_FLOOR: u8 = 1;
/// Floor the car returns to when idle.
pub const HOME_FLOOR: u8 = 1;

/// Nominal tick period of the simulation clock (~60 Hz).
pub const TICK: Duration = Duration::from_millis(16);

/// Car travel speed: one floor every two seconds.
pub const SPEED_FLOORS_PER_SEC: f64 = 0.5;
/// Distance from an integer floor at which the car counts as arrived.
pub const ARRIVAL_EPSILON: f64 = 0.01;

/// Duration of the door opening and closing animations.
pub const DOOR_ANIMATION_MS: u64 = 500;
/// Time the doors stay fully open before closing again.
pub const DOOR_DWELL_MS: u64 = 2_000;
/// Idle time before the car heads back to [`HOME_FLOOR`].
pub const HOMING_DELAY_MS: u64 = 5_000;

/// Whether `floor` is a real floor of this shaft.
#[inline]
pub const fn is_valid_floor(floor: u8) -> bool {
    floor >= BOTTOM_FLOOR && floor <= FLOORS
}
