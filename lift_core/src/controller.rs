//! The orchestrator: owns the car, the doors, the pending requests and the
//! idle-homing timer, and decides what happens next after every event.
//!
//! Everything runs on one timeline. Callers feed [`Event`]s (or call
//! [`Controller::tick`] / [`Controller::press`] directly) from a single
//! consumer; there is no interior locking.

use std::time::Duration;

use crate::consts::{HOME_FLOOR, HOMING_DELAY_MS};
use crate::dispatch;
use crate::door::{Door, DoorEvent};
use crate::error::LiftError;
use crate::motion::{Arrival, Car};
use crate::requests::RequestStore;
use crate::status::Snapshot;
use crate::timer::{HomingKey, IdleHoming};
use crate::types::{Direction, DoorState, Floor, Press};
use crate::util::as_millis_u64;

/// Inputs to the controller timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Time advanced by this much.
    Tick(Duration),
    /// A rider pressed a button.
    Press(Press),
}

#[derive(Debug, Clone)]
pub struct Controller {
    car: Car,
    door: Door,
    requests: RequestStore,
    homing: IdleHoming,
    // Exact; whole milliseconds are derived from it so sub-ms ticks add up.
    elapsed: Duration,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    /// Power-on state: car at the home floor, doors open, nothing pending.
    pub fn new() -> Self {
        Self {
            car: Car::at_floor(HOME_FLOOR),
            door: Door::open_idle(),
            requests: RequestStore::new(),
            homing: IdleHoming::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Car idle at `floor` with its doors closed.
    pub fn resting_at(floor: Floor) -> Self {
        let mut ctrl = Self {
            car: Car::at_floor(floor),
            door: Door::closed(),
            requests: RequestStore::new(),
            homing: IdleHoming::new(),
            elapsed: Duration::ZERO,
        };
        ctrl.refresh_homing();
        ctrl
    }

    pub fn handle(&mut self, event: Event) -> Result<(), LiftError> {
        match event {
            Event::Tick(dt) => self.tick(dt),
            Event::Press(press) => self.press(press).map(|_| ()),
        }
    }

    /// Register a button press. Returns whether it changed the pending
    /// requests; presses for missing buttons or for the floor the car stands
    /// at with doors open are ignored.
    pub fn press(&mut self, press: Press) -> Result<bool, LiftError> {
        let accepted = self.accept(press);
        if accepted {
            self.reconcile()?;
        }
        Ok(accepted)
    }

    /// Register several presses that arrived together, then decide once.
    pub fn press_all(&mut self, presses: impl IntoIterator<Item = Press>) -> Result<usize, LiftError> {
        let accepted = presses.into_iter().filter(|p| self.accept(*p)).count();
        if accepted > 0 {
            self.reconcile()?;
        }
        Ok(accepted)
    }

    fn accept(&mut self, press: Press) -> bool {
        let accepted = self.requests.press(press, self.parked_at());
        if accepted {
            tracing::debug!(%press, "press accepted");
            if self.car.is_homing() && self.requests.has_any() {
                self.car.cancel_homing();
                tracing::debug!("homing run cancelled by press");
            }
        }
        accepted
    }

    /// Advance time by `dt`: moves the car or runs the doors, polls the
    /// homing timer, then reconciles.
    pub fn tick(&mut self, dt: Duration) -> Result<(), LiftError> {
        let before_ms = self.now_ms();
        self.elapsed = self.elapsed.saturating_add(dt);
        let dt_ms = self.now_ms().saturating_sub(before_ms);

        if self.car.is_moving() {
            if let Some(arrival) = self.car.advance(dt, &mut self.requests) {
                self.on_arrival(arrival)?;
            }
        } else {
            let stay_open = !self.requests.has_any() && self.car.floor() == HOME_FLOOR;
            match self.door.tick(dt_ms, stay_open) {
                Some(DoorEvent::Parked) => {
                    self.car.set_direction(Direction::Idle);
                    tracing::debug!(floor = self.car.floor(), "doors parked open");
                }
                Some(DoorEvent::Closed) => {
                    tracing::debug!(floor = self.car.floor(), "doors closed");
                }
                Some(DoorEvent::Closing) | None => {}
            }
        }

        self.refresh_homing();
        if self.homing.poll(self.now_ms()) {
            self.go_home()?;
        }
        self.reconcile()
    }

    fn on_arrival(&mut self, arrival: Arrival) -> Result<(), LiftError> {
        match arrival {
            Arrival::Served(floor) => {
                tracing::info!(floor, direction = %self.car.direction(), "arrived");
                self.door.open()
            }
            Arrival::Exhausted(floor) => {
                tracing::info!(floor, "stopped with nothing to serve");
                Ok(())
            }
            Arrival::Passed(floor) => {
                tracing::trace!(floor, "passing floor");
                Ok(())
            }
            Arrival::Reversed(floor) => {
                tracing::debug!(floor, direction = %self.car.direction(), "reversed");
                Ok(())
            }
        }
    }

    fn go_home(&mut self) -> Result<(), LiftError> {
        let floor = self.car.floor();
        if self.requests.has_any()
            || self.car.is_moving()
            || floor == HOME_FLOOR
            || !self.door.is_closed()
        {
            tracing::debug!(floor, "idle-homing timer fired on a busy car; ignoring");
            return Ok(());
        }
        tracing::info!(from = floor, to = HOME_FLOOR, "idle timeout; returning home");
        self.car.depart_home().inspect_err(contract_violated)
    }

    /// Decide the next action from the current state. Runs after every
    /// event.
    fn reconcile(&mut self) -> Result<(), LiftError> {
        self.refresh_homing();
        if self.car.is_moving() || self.door.is_animating() {
            return Ok(());
        }

        let floor = self.car.floor();
        match self.door.state() {
            DoorState::Open if self.requests.has_any() => {
                self.door.close().inspect_err(contract_violated)?;
            }
            DoorState::Closed if self.requests.has_any_at(floor) => {
                self.requests.clear_all_at(floor);
                tracing::info!(floor, "serving request at current floor");
                self.door.open().inspect_err(contract_violated)?;
            }
            DoorState::Closed => {
                match dispatch::next_target(self.car.direction(), floor, &self.requests) {
                    Some(target) if target != floor => {
                        let direction = Direction::toward(floor, target);
                        tracing::info!(from = floor, target, %direction, "dispatching");
                        self.car.depart(direction).inspect_err(contract_violated)?;
                    }
                    Some(_) => {
                        self.door.open().inspect_err(contract_violated)?;
                    }
                    None => self.car.set_direction(Direction::Idle),
                }
            }
            DoorState::Open | DoorState::Opening | DoorState::Closing => {}
        }

        self.refresh_homing();
        Ok(())
    }

    fn refresh_homing(&mut self) {
        let floor = self.car.floor();
        let moving = self.car.is_moving();
        let key = HomingKey {
            floor,
            door: self.door.state(),
            moving,
            requests_revision: self.requests.revision(),
        };
        let eligible = !self.requests.has_any() && !moving && floor != HOME_FLOOR;
        self.homing.observe(self.now_ms(), key, eligible, HOMING_DELAY_MS);
    }

    /// Floor where the car stands with doors open, if any. Presses for that
    /// floor are no-ops.
    pub fn parked_at(&self) -> Option<Floor> {
        let open = matches!(self.door.state(), DoorState::Opening | DoorState::Open);
        (!self.car.is_moving() && open).then(|| self.car.floor())
    }

    /// Nothing left to do until the next press: no requests, car stopped,
    /// doors at rest and no homing run scheduled.
    pub fn is_quiescent(&self) -> bool {
        !self.requests.has_any()
            && !self.car.is_moving()
            && matches!(self.door.state(), DoorState::Open | DoorState::Closed)
            && !self.homing.is_pending()
    }

    /// Controller time in whole milliseconds.
    pub fn now_ms(&self) -> u64 {
        as_millis_u64(self.elapsed)
    }

    pub fn requests(&self) -> &RequestStore {
        &self.requests
    }

    pub fn homing_due_at(&self) -> Option<u64> {
        self.homing.fire_at()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_floor: self.car.floor(),
            position: self.car.position(),
            display_position: self.car.display_position(),
            direction: self.car.direction(),
            door_state: self.door.state(),
            door_progress: self.door.progress(),
            internal: self.requests.internal().clone(),
            up_calls: self.requests.up_calls().clone(),
            down_calls: self.requests.down_calls().clone(),
            is_moving: self.car.is_moving(),
            elapsed_ms: self.now_ms(),
        }
    }
}

fn contract_violated(e: &LiftError) {
    tracing::warn!(error = %e, "controller contract violated");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TICK;

    fn run_for(ctrl: &mut Controller, ms: u64) {
        let ticks = ms.div_ceil(16);
        for _ in 0..ticks {
            ctrl.tick(TICK).unwrap();
        }
    }

    fn run_until_quiescent(ctrl: &mut Controller) {
        for _ in 0..100_000 {
            if ctrl.is_quiescent() {
                return;
            }
            ctrl.tick(TICK).unwrap();
        }
        panic!("controller never settled: {:?}", ctrl.snapshot());
    }

    #[test]
    fn powers_on_home_with_doors_open() {
        let ctrl = Controller::new();
        let s = ctrl.snapshot();
        assert_eq!(s.current_floor, 1);
        assert_eq!(s.position, 1.0);
        assert_eq!(s.door_state, DoorState::Open);
        assert_eq!(s.direction, Direction::Idle);
        assert!(!s.has_requests());
        assert!(ctrl.is_quiescent());
    }

    #[test]
    fn press_with_doors_open_starts_closing() {
        let mut ctrl = Controller::new();
        assert!(ctrl.press(Press::car(4)).unwrap());
        assert_eq!(ctrl.snapshot().door_state, DoorState::Closing);
        run_for(&mut ctrl, 520);
        let s = ctrl.snapshot();
        assert!(s.is_moving);
        assert_eq!(s.direction, Direction::Up);
        assert_eq!(s.door_state, DoorState::Closed);
    }

    #[test]
    fn press_at_parked_floor_is_ignored() {
        let mut ctrl = Controller::new();
        assert!(!ctrl.press(Press::car(1)).unwrap());
        assert!(!ctrl.press(Press::up(1)).unwrap());
        assert_eq!(ctrl.snapshot().door_state, DoorState::Open);
    }

    #[test]
    fn missing_button_is_ignored() {
        let mut ctrl = Controller::new();
        assert!(!ctrl.press(Press::down(1)).unwrap());
        assert!(!ctrl.press(Press::car(9)).unwrap());
        assert!(ctrl.is_quiescent());
    }

    #[test]
    fn scenario_a_serves_then_homes() {
        let mut ctrl = Controller::new();
        ctrl.press(Press::car(4)).unwrap();

        // close 500 + travel 3 floors 6000
        run_for(&mut ctrl, 6_600);
        let s = ctrl.snapshot();
        assert_eq!(s.current_floor, 4);
        assert!(!s.is_moving);
        assert_eq!(s.door_state, DoorState::Opening);
        assert!(s.internal.is_empty());

        // dwell then close; car is off the home floor so doors do not park
        run_for(&mut ctrl, 3_100);
        assert_eq!(ctrl.snapshot().door_state, DoorState::Closed);
        assert!(ctrl.homing_due_at().is_some());

        run_until_quiescent(&mut ctrl);
        let s = ctrl.snapshot();
        assert_eq!(s.current_floor, 1);
        assert_eq!(s.door_state, DoorState::Open);
        assert_eq!(s.direction, Direction::Idle);
        assert!(s.elapsed_ms > 20_000 && s.elapsed_ms < 26_000, "{}", s.elapsed_ms);
    }

    #[test]
    fn scenario_b_tie_goes_up() {
        let mut ctrl = Controller::resting_at(3);
        ctrl.press_all([Press::car(1), Press::up(5)]).unwrap();
        let s = ctrl.snapshot();
        assert!(s.is_moving);
        assert_eq!(s.direction, Direction::Up);
        run_for(&mut ctrl, 4_100);
        assert_eq!(ctrl.snapshot().current_floor, 5);
        assert!(!ctrl.snapshot().up_calls.contains(&5));
    }

    #[test]
    fn press_during_homing_takes_over() {
        let mut ctrl = Controller::resting_at(5);
        run_for(&mut ctrl, 5_100);
        assert!(ctrl.snapshot().is_moving);
        assert_eq!(ctrl.snapshot().direction, Direction::Down);

        ctrl.press(Press::car(3)).unwrap();
        run_for(&mut ctrl, 4_100);
        let s = ctrl.snapshot();
        assert_eq!(s.current_floor, 3);
        assert!(!s.is_moving);
        assert!(s.internal.is_empty());
    }

    #[test]
    fn press_restarts_homing_wait() {
        let mut ctrl = Controller::resting_at(4);
        let first = ctrl.homing_due_at().unwrap();
        run_for(&mut ctrl, 3_000);
        // toggle on and straight back off before anything moves
        ctrl.press_all([Press::car(2), Press::car(2)]).unwrap();
        run_for(&mut ctrl, 16);
        let second = ctrl.homing_due_at().unwrap();
        assert!(second > first);
    }

    #[test]
    fn request_at_closed_floor_reopens() {
        let mut ctrl = Controller::resting_at(2);
        ctrl.press(Press::up(2)).unwrap();
        let s = ctrl.snapshot();
        assert_eq!(s.door_state, DoorState::Opening);
        assert!(s.up_calls.is_empty());
    }

    #[test]
    fn handle_routes_events() {
        let mut ctrl = Controller::new();
        ctrl.handle(Event::Press(Press::up(3))).unwrap();
        ctrl.handle(Event::Tick(Duration::from_millis(100))).unwrap();
        assert_eq!(ctrl.now_ms(), 100);
        assert_eq!(ctrl.snapshot().door_state, DoorState::Closing);
    }

    #[test]
    fn sub_millisecond_ticks_still_drive_the_doors() {
        let mut ctrl = Controller::new();
        ctrl.press(Press::car(2)).unwrap();
        // 2222 ticks of 900 us is just under 2 s
        for _ in 0..2_222 {
            ctrl.tick(Duration::from_micros(900)).unwrap();
        }
        let s = ctrl.snapshot();
        assert_eq!(ctrl.now_ms(), 1_999);
        assert_eq!(s.door_state, DoorState::Closed);
        assert!(s.is_moving, "{s:?}");
        assert!(s.position > 1.5 && s.position < 2.0, "{}", s.position);
    }

    #[test]
    fn fractional_ticks_keep_door_timing_exact() {
        let dt = Duration::from_micros(16_900);
        let mut ctrl = Controller::new();
        ctrl.press(Press::car(3)).unwrap();
        let mut ticks = 0u32;
        while ctrl.snapshot().door_state != DoorState::Closed {
            ctrl.tick(dt).unwrap();
            ticks += 1;
            assert!(ticks < 100, "doors never closed");
        }
        // 500 ms animation at 16.9 ms per tick closes on tick 30
        assert_eq!(ticks, 30);
        assert_eq!(ctrl.now_ms(), (dt * ticks).as_millis() as u64);
    }
}
