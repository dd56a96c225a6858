//! Cancelable deferred action used for idle-homing.
//!
//! A pending action is a fire-at timestamp stamped with the generation that
//! armed it. Cancelling bumps the generation, which orphans whatever is
//! pending; `poll` drops orphans instead of firing them.

use crate::types::{DoorState, Floor};

#[derive(Debug, Clone, Copy)]
struct Pending {
    fire_at_ms: u64,
    generation: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Deferred {
    generation: u64,
    pending: Option<Pending>,
}

impl Deferred {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the action to fire `delay_ms` after `now_ms`, replacing anything
    /// already pending. Returns the generation of the new action.
    pub fn arm(&mut self, now_ms: u64, delay_ms: u64) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.pending = Some(Pending {
            fire_at_ms: now_ms.saturating_add(delay_ms),
            generation: self.generation,
        });
        self.generation
    }

    /// Invalidate any pending action.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn live(&self) -> Option<Pending> {
        self.pending.filter(|p| p.generation == self.generation)
    }

    pub fn is_pending(&self) -> bool {
        self.live().is_some()
    }

    pub fn fire_at(&self) -> Option<u64> {
        self.live().map(|p| p.fire_at_ms)
    }

    /// Returns `true` exactly once when a live action is due.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.pending {
            Some(p) if p.generation != self.generation => {
                self.pending = None;
                false
            }
            Some(p) if now_ms >= p.fire_at_ms => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

/// The state the homing timer is keyed on. Any change restarts the wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomingKey {
    pub floor: Floor,
    pub door: DoorState,
    pub moving: bool,
    pub requests_revision: u64,
}

/// Idle-homing wait: restarted whenever the observed state changes and armed
/// only while the car is eligible to go home.
#[derive(Debug, Clone, Default)]
pub struct IdleHoming {
    timer: Deferred,
    last_key: Option<HomingKey>,
}

impl IdleHoming {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current state. A changed key cancels the pending wait and, if
    /// `eligible`, arms a fresh one.
    pub fn observe(&mut self, now_ms: u64, key: HomingKey, eligible: bool, delay_ms: u64) {
        if self.last_key == Some(key) {
            return;
        }
        self.last_key = Some(key);
        self.timer.cancel();
        if eligible {
            let generation = self.timer.arm(now_ms, delay_ms);
            tracing::debug!(floor = key.floor, generation, "idle-homing timer armed");
        }
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn fire_at(&self) -> Option<u64> {
        self.timer.fire_at()
    }

    /// Whether the wait has elapsed; fires at most once per arm.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        self.timer.poll(now_ms)
    }
}
