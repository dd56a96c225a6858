//! Runtime parameters for simulation and live runs.
//!
//! These are the core-side structs. They are separate from the
//! TOML-deserialized config in `lift_config`; see `conversions`.

use std::time::Duration;

use crate::consts::TICK;

/// How a deterministic simulation is paced against wall time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pace {
    /// Step as fast as possible.
    #[default]
    Fast,
    /// Sleep one tick per step so the run can be watched.
    Realtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParams {
    /// Fixed step fed to the controller.
    pub tick: Duration,
    /// Abort once simulated (or, for live runs, wall) time exceeds this.
    /// `None` runs without a cap.
    pub max_run: Option<Duration>,
    pub pace: Pace,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            tick: TICK,
            max_run: Some(Duration::from_secs(300)),
            pace: Pace::Fast,
        }
    }
}

impl RunParams {
    pub fn with_max_run(mut self, max_run: Option<Duration>) -> Self {
        self.max_run = max_run;
        self
    }

    pub fn with_pace(mut self, pace: Pace) -> Self {
        self.pace = pace;
        self
    }
}
