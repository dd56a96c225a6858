//! Pending-request bookkeeping: car buttons, up-calls and down-calls.
//!
//! All mutation happens on the controller's timeline, so there is no locking.

use std::collections::BTreeSet;

use crate::types::{Button, Direction, Floor, Press};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestStore {
    internal: BTreeSet<Floor>,
    up: BTreeSet<Floor>,
    down: BTreeSet<Floor>,
    // Bumped on every effective mutation
    revision: u64,
}

impl RequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from raw sets, skipping press validation.
    ///
    /// Useful for reconstructing a snapshot or for setting up states that no
    /// sequence of presses produces (e.g. an up-call on the top floor).
    pub fn from_sets(
        internal: impl IntoIterator<Item = Floor>,
        up: impl IntoIterator<Item = Floor>,
        down: impl IntoIterator<Item = Floor>,
    ) -> Self {
        Self {
            internal: internal.into_iter().collect(),
            up: up.into_iter().collect(),
            down: down.into_iter().collect(),
            revision: 0,
        }
    }

    /// Apply a button press. `parked_at` is the floor where the car currently
    /// stands with its doors open, if any; presses for that floor are ignored.
    ///
    /// Returns `true` when the store changed.
    pub fn press(&mut self, press: Press, parked_at: Option<Floor>) -> bool {
        if !press.is_valid() {
            tracing::debug!(%press, "ignoring press for a button that does not exist");
            return false;
        }
        match press.button {
            Button::Car => self.add_internal(press.floor, parked_at),
            Button::HallUp => self.add_call(press.floor, true, parked_at),
            Button::HallDown => self.add_call(press.floor, false, parked_at),
        }
    }

    /// Toggle a car button.
    pub fn add_internal(&mut self, floor: Floor, parked_at: Option<Floor>) -> bool {
        if parked_at == Some(floor) {
            return false;
        }
        if !self.internal.remove(&floor) {
            self.internal.insert(floor);
        }
        self.revision += 1;
        true
    }

    /// Light a hall call. Re-pressing a lit call does nothing.
    pub fn add_call(&mut self, floor: Floor, is_up: bool, parked_at: Option<Floor>) -> bool {
        if parked_at == Some(floor) {
            return false;
        }
        let set = if is_up { &mut self.up } else { &mut self.down };
        let inserted = set.insert(floor);
        if inserted {
            self.revision += 1;
        }
        inserted
    }

    /// Clear requests served at `floor` while travelling `serviced`.
    ///
    /// The car button is always cleared. Only the call matching the direction
    /// is cleared; `Direction::Idle` clears both calls.
    pub fn clear_at_floor(&mut self, floor: Floor, serviced: Direction) {
        let mut changed = self.internal.remove(&floor);
        changed |= match serviced {
            Direction::Up => self.up.remove(&floor),
            Direction::Down => self.down.remove(&floor),
            Direction::Idle => self.up.remove(&floor) | self.down.remove(&floor),
        };
        if changed {
            self.revision += 1;
        }
    }

    /// Clear every request at `floor`.
    pub fn clear_all_at(&mut self, floor: Floor) {
        self.clear_at_floor(floor, Direction::Idle);
    }

    pub fn has_any(&self) -> bool {
        !(self.internal.is_empty() && self.up.is_empty() && self.down.is_empty())
    }

    pub fn has_any_at(&self, floor: Floor) -> bool {
        self.internal.contains(&floor) || self.up.contains(&floor) || self.down.contains(&floor)
    }

    /// Whether a hall call for `dir` is lit at `floor`.
    pub fn has_call(&self, floor: Floor, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up.contains(&floor),
            Direction::Down => self.down.contains(&floor),
            Direction::Idle => false,
        }
    }

    /// Whether the car should stop at `floor` when travelling `dir`: a car
    /// button, or a call in the travel direction.
    pub fn wants_stop(&self, floor: Floor, dir: Direction) -> bool {
        self.internal.contains(&floor) || self.has_call(floor, dir)
    }

    /// Any request of any kind strictly past `floor` in direction `dir`.
    pub fn any_beyond(&self, floor: Floor, dir: Direction) -> bool {
        let past = |f: &Floor| match dir {
            Direction::Up => *f > floor,
            Direction::Down => *f < floor,
            Direction::Idle => false,
        };
        self.internal.iter().any(past) || self.up.iter().any(past) || self.down.iter().any(past)
    }

    /// Floors that can be served while travelling up (car buttons and up-calls).
    pub fn up_floors(&self) -> impl Iterator<Item = Floor> + '_ {
        self.internal.union(&self.up).copied()
    }

    /// Floors that can be served while travelling down.
    pub fn down_floors(&self) -> impl Iterator<Item = Floor> + '_ {
        self.internal.union(&self.down).copied()
    }

    /// Every floor with at least one pending request.
    pub fn all_floors(&self) -> impl Iterator<Item = Floor> + '_ {
        self.internal
            .iter()
            .chain(self.up.iter())
            .chain(self.down.iter())
            .copied()
    }

    pub fn internal(&self) -> &BTreeSet<Floor> {
        &self.internal
    }

    pub fn up_calls(&self) -> &BTreeSet<Floor> {
        &self.up
    }

    pub fn down_calls(&self) -> &BTreeSet<Floor> {
        &self.down
    }

    /// Monotonic counter of effective mutations; lets callers detect change
    /// without comparing sets.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
