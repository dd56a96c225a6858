//! Car state published after every controller step.

use std::collections::BTreeSet;

use crate::types::{Direction, DoorState, Floor};

/// Read-only view of the controller, taken once per tick for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Settled floor, or the last floor passed while moving.
    pub current_floor: Floor,
    /// Physical position in floors; 1.0 is the bottom floor.
    pub position: f64,
    /// Eased position for smooth rendering. Never used for decisions.
    pub display_position: f64,
    pub direction: Direction,
    pub door_state: DoorState,
    /// 0.0 = closed, 1.0 = open.
    pub door_progress: f64,
    pub internal: BTreeSet<Floor>,
    pub up_calls: BTreeSet<Floor>,
    pub down_calls: BTreeSet<Floor>,
    pub is_moving: bool,
    /// Controller time since start.
    pub elapsed_ms: u64,
}

impl Snapshot {
    /// Same car state, ignoring time and sub-floor position. Views use this
    /// to print only when something a rider would notice has changed.
    pub fn same_state(&self, other: &Self) -> bool {
        self.current_floor == other.current_floor
            && self.direction == other.direction
            && self.door_state == other.door_state
            && self.is_moving == other.is_moving
            && self.internal == other.internal
            && self.up_calls == other.up_calls
            && self.down_calls == other.down_calls
    }

    pub fn has_requests(&self) -> bool {
        !(self.internal.is_empty() && self.up_calls.is_empty() && self.down_calls.is_empty())
    }
}
