//! Door cycle: opening → dwell → closing → closed.
//!
//! Runs are advanced by tick elapsed time; nothing here sleeps. The dwell is
//! reported as `Opening` so a second open cannot be started mid-dwell.

use crate::consts::{DOOR_ANIMATION_MS, DOOR_DWELL_MS};
use crate::error::LiftError;
use crate::types::DoorState;
use crate::util::{ease_in, ease_out, fraction};

/// Transitions reported by [`Door::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorEvent {
    /// Dwell ended with nothing left to do at home; doors stay open.
    Parked,
    /// Dwell ended; doors started closing.
    Closing,
    /// Closing animation finished; the car may move.
    Closed,
}

#[derive(Debug, Clone)]
pub struct Door {
    state: DoorState,
    // 0.0 = closed, 1.0 = open
    progress: f64,
    // ms spent in the current run
    phase_ms: u64,
}

impl Door {
    /// Doors fully open and idle, as at power-on.
    pub fn open_idle() -> Self {
        Self {
            state: DoorState::Open,
            progress: 1.0,
            phase_ms: 0,
        }
    }

    pub fn closed() -> Self {
        Self {
            state: DoorState::Closed,
            progress: 0.0,
            phase_ms: 0,
        }
    }

    pub fn state(&self) -> DoorState {
        self.state
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_closed(&self) -> bool {
        self.state == DoorState::Closed
    }

    /// Whether a door run (opening, dwell or closing) is in progress.
    pub fn is_animating(&self) -> bool {
        matches!(self.state, DoorState::Opening | DoorState::Closing)
    }

    /// Start an open run. Only valid from `Closed`.
    pub fn open(&mut self) -> Result<(), LiftError> {
        if self.state != DoorState::Closed {
            return Err(LiftError::Contract("door open requested while doors are not closed"));
        }
        self.state = DoorState::Opening;
        self.phase_ms = 0;
        tracing::debug!("doors opening");
        Ok(())
    }

    /// Start a close run. Only valid from `Open`.
    pub fn close(&mut self) -> Result<(), LiftError> {
        if self.state != DoorState::Open {
            return Err(LiftError::Contract("door close requested while doors are not open"));
        }
        self.state = DoorState::Closing;
        self.phase_ms = 0;
        tracing::debug!("doors closing");
        Ok(())
    }

    /// Advance the active run by `dt_ms`.
    ///
    /// `stay_open` is consulted once, at the end of the dwell: when true the
    /// doors park `Open`, otherwise they start closing.
    pub fn tick(&mut self, dt_ms: u64, stay_open: bool) -> Option<DoorEvent> {
        match self.state {
            DoorState::Opening => {
                self.phase_ms = self.phase_ms.saturating_add(dt_ms);
                self.progress = ease_out(fraction(self.phase_ms, DOOR_ANIMATION_MS));
                if self.phase_ms < DOOR_ANIMATION_MS + DOOR_DWELL_MS {
                    return None;
                }
                self.progress = 1.0;
                self.phase_ms = 0;
                if stay_open {
                    self.state = DoorState::Open;
                    Some(DoorEvent::Parked)
                } else {
                    self.state = DoorState::Closing;
                    Some(DoorEvent::Closing)
                }
            }
            DoorState::Closing => {
                self.phase_ms = self.phase_ms.saturating_add(dt_ms);
                self.progress = 1.0 - ease_in(fraction(self.phase_ms, DOOR_ANIMATION_MS));
                if self.phase_ms < DOOR_ANIMATION_MS {
                    return None;
                }
                self.progress = 0.0;
                self.phase_ms = 0;
                self.state = DoorState::Closed;
                Some(DoorEvent::Closed)
            }
            DoorState::Open | DoorState::Closed => None,
        }
    }
}
