//! `From` implementations bridging `lift_config` types to `lift_core` types.

use std::time::Duration;

use crate::config::{Pace, RunParams};
use crate::sim::{Scenario, ScheduledPress};
use crate::types::{Button, Press};

// ── Buttons and presses ──────────────────────────────────────────────────────

impl From<lift_config::ButtonName> for Button {
    fn from(b: lift_config::ButtonName) -> Self {
        match b {
            lift_config::ButtonName::Car => Button::Car,
            lift_config::ButtonName::Up => Button::HallUp,
            lift_config::ButtonName::Down => Button::HallDown,
        }
    }
}

impl From<&lift_config::PressRow> for Press {
    fn from(r: &lift_config::PressRow) -> Self {
        Self {
            button: r.button.into(),
            floor: r.floor,
        }
    }
}

impl From<&lift_config::PressRow> for ScheduledPress {
    fn from(r: &lift_config::PressRow) -> Self {
        Self {
            at_ms: r.at_ms,
            press: r.into(),
        }
    }
}

impl From<&[lift_config::PressRow]> for Scenario {
    fn from(rows: &[lift_config::PressRow]) -> Self {
        rows.iter().map(ScheduledPress::from).collect()
    }
}

// ── RunParams ────────────────────────────────────────────────────────────────

impl From<&lift_config::SimCfg> for RunParams {
    fn from(c: &lift_config::SimCfg) -> Self {
        Self {
            tick: Duration::from_millis(c.tick_ms),
            max_run: Some(Duration::from_millis(c.max_run_ms)),
            pace: if c.realtime { Pace::Realtime } else { Pace::Fast },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lift_config::{ButtonName, PressRow, SimCfg};

    #[test]
    fn rows_map_to_presses() {
        let rows = [
            PressRow {
                at_ms: 0,
                button: ButtonName::Down,
                floor: 6,
            },
            PressRow {
                at_ms: 10,
                button: ButtonName::Car,
                floor: 2,
            },
        ];
        let scenario = Scenario::from(&rows[..]);
        assert_eq!(
            scenario.presses(),
            &[
                ScheduledPress {
                    at_ms: 0,
                    press: Press::down(6)
                },
                ScheduledPress {
                    at_ms: 10,
                    press: Press::car(2)
                },
            ]
        );
    }

    #[test]
    fn sim_cfg_maps_to_params() {
        let p = RunParams::from(&SimCfg {
            tick_ms: 20,
            max_run_ms: 1_000,
            realtime: true,
        });
        assert_eq!(p.tick, Duration::from_millis(20));
        assert_eq!(p.max_run, Some(Duration::from_secs(1)));
        assert_eq!(p.pace, Pace::Realtime);
    }
}
