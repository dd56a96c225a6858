//! Deterministic simulation: a scripted list of presses replayed against the
//! controller with a fixed tick.

use std::str::FromStr;
use std::time::Duration;

use lift_traits::clock::Clock;

use crate::config::{Pace, RunParams};
use crate::controller::Controller;
use crate::error::{AbortReason, LiftError, Report, Result as CoreResult};
use crate::status::Snapshot;
use crate::types::Press;
use crate::util::as_millis_u64;
use crate::view::CarView;

/// A press delivered once simulated time reaches `at_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledPress {
    pub at_ms: u64,
    pub press: Press,
}

impl ScheduledPress {
    pub fn at(at_ms: u64, press: Press) -> Self {
        Self { at_ms, press }
    }
}

/// Parses `car 4` (delivered at once) or `car 4@1500` (delivered at 1500 ms).
impl FromStr for ScheduledPress {
    type Err = LiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (press, at) = match s.split_once('@') {
            Some((press, at)) => (press, Some(at.trim())),
            None => (s, None),
        };
        let at_ms = match at {
            Some(at) => at
                .parse()
                .map_err(|_| LiftError::Parse(format!("press time {at:?} is not a number of ms")))?,
            None => 0,
        };
        Ok(Self {
            at_ms,
            press: press.parse()?,
        })
    }
}

/// Scripted presses, kept sorted by delivery time. Presses sharing a time
/// keep their listed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scenario {
    presses: Vec<ScheduledPress>,
}

impl Scenario {
    pub fn new(mut presses: Vec<ScheduledPress>) -> Self {
        presses.sort_by_key(|p| p.at_ms);
        Self { presses }
    }

    pub fn presses(&self) -> &[ScheduledPress] {
        &self.presses
    }

    pub fn is_empty(&self) -> bool {
        self.presses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.presses.len()
    }

    /// Time of the last scripted press.
    pub fn last_at_ms(&self) -> u64 {
        self.presses.last().map_or(0, |p| p.at_ms)
    }
}

impl FromIterator<ScheduledPress> for Scenario {
    fn from_iter<I: IntoIterator<Item = ScheduledPress>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Run `scenario` against `ctrl` until every press is delivered and the car
/// has nothing left to do. Press times are relative to the controller's time
/// when the call starts.
///
/// Every step is rendered to `view`. The returned snapshot is the settled
/// state. Exceeding `params.max_run` of simulated time aborts with
/// [`AbortReason::MaxRuntime`].
pub fn simulate<V, C>(
    ctrl: &mut Controller,
    scenario: &Scenario,
    view: &mut V,
    params: &RunParams,
    clock: &C,
) -> CoreResult<Snapshot>
where
    V: CarView + ?Sized,
    C: Clock + ?Sized,
{
    if params.tick.is_zero() {
        return Err(Report::new(LiftError::Config("tick must be non-zero".into())));
    }
    let start_ms = ctrl.now_ms();
    let max_ms = params.max_run.map(as_millis_u64);
    let tick_ms = as_millis_u64(params.tick);
    tracing::info!(
        presses = scenario.len(),
        tick_ms,
        pace = ?params.pace,
        "simulation start"
    );

    let mut next = 0usize;
    loop {
        let sim_ms = ctrl.now_ms().saturating_sub(start_ms);
        let due = &scenario.presses()[next..];
        let n_due = due.iter().take_while(|p| p.at_ms <= sim_ms).count();
        if n_due > 0 {
            let accepted = ctrl.press_all(due[..n_due].iter().map(|p| p.press))?;
            tracing::debug!(sim_ms, delivered = n_due, accepted, "scripted presses");
            next += n_due;
        }

        let snapshot = ctrl.snapshot();
        view.render(&snapshot);

        if next == scenario.len() && ctrl.is_quiescent() {
            tracing::info!(
                sim_ms,
                floor = snapshot.current_floor,
                door = %snapshot.door_state,
                "simulation settled"
            );
            view.finish(&snapshot);
            return Ok(snapshot);
        }

        if let Some(max_ms) = max_ms
            && sim_ms >= max_ms
        {
            tracing::warn!(sim_ms, max_ms, "simulation did not settle in time");
            view.finish(&snapshot);
            return Err(Report::new(LiftError::Abort(AbortReason::MaxRuntime)));
        }

        ctrl.tick(params.tick)?;
        if params.pace == Pace::Realtime {
            clock.sleep(params.tick);
        }
    }
}

/// Headless convenience: simulate from power-on with the default tick.
pub fn settle(scenario: &Scenario, max_run: Option<Duration>) -> CoreResult<Snapshot> {
    let mut ctrl = Controller::new();
    let params = RunParams::default().with_max_run(max_run);
    simulate(
        &mut ctrl,
        scenario,
        &mut crate::mocks::NullView,
        &params,
        &lift_traits::MonotonicClock::new(),
    )
}
