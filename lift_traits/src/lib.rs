//! Seams shared across the lift workspace.
//!
//! Everything time-related in the simulator goes through [`Clock`] so that
//! tests can replace wall time with a manually advanced clock.
pub mod clock;

pub use clock::{Clock, MonotonicClock};
