//! Car motion: position integration, arrival detection and the
//! stop / continue / reverse decision taken at every floor.
//!
//! A run has no predetermined destination. Each arrival re-reads the pending
//! requests, so a press made mid-run is honoured at the next floor.

use std::time::Duration;

use crate::consts::{ARRIVAL_EPSILON, BOTTOM_FLOOR, FLOORS, HOME_FLOOR, SPEED_FLOORS_PER_SEC};
use crate::error::LiftError;
use crate::requests::RequestStore;
use crate::types::{Direction, Floor};
use crate::util::ease_in_out;

/// What happened when the car reached a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// Went through `floor` without stopping.
    Passed(Floor),
    /// Nothing left ahead: flipped direction at `floor` and kept moving.
    Reversed(Floor),
    /// Stopped at `floor` to serve it; doors should open.
    Served(Floor),
    /// Stopped at `floor` with nothing left to do; direction cleared.
    Exhausted(Floor),
}

impl Arrival {
    pub fn floor(self) -> Floor {
        match self {
            Arrival::Passed(f) | Arrival::Reversed(f) | Arrival::Served(f) | Arrival::Exhausted(f) => f,
        }
    }

    /// Whether the run ended at this floor.
    pub fn is_stop(self) -> bool {
        matches!(self, Arrival::Served(_) | Arrival::Exhausted(_))
    }
}

/// Physical state of the car.
#[derive(Debug, Clone)]
pub struct Car {
    // 1.0 = exactly at floor 1
    position: f64,
    // settled floor, or last floor passed while moving
    floor: Floor,
    direction: Direction,
    moving: bool,
    // run commanded by the idle-homing timer
    homing: bool,
}

impl Car {
    pub fn at_floor(floor: Floor) -> Self {
        let floor = floor.clamp(BOTTOM_FLOOR, FLOORS);
        Self {
            position: f64::from(floor),
            floor,
            direction: Direction::Idle,
            moving: false,
            homing: false,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn floor(&self) -> Floor {
        self.floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_homing(&self) -> bool {
        self.homing
    }

    /// Commit to a direction without moving (the controller's dispatch
    /// decision, or clearing it when idle).
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Start a run in `direction`.
    pub fn depart(&mut self, direction: Direction) -> Result<(), LiftError> {
        if self.moving {
            return Err(LiftError::Contract("motion run started while already moving"));
        }
        let leaves_shaft = match direction {
            Direction::Up => self.floor >= FLOORS,
            Direction::Down => self.floor <= BOTTOM_FLOOR,
            Direction::Idle => true,
        };
        if leaves_shaft {
            return Err(LiftError::Contract("motion run has no floor to head for"));
        }
        self.direction = direction;
        self.moving = true;
        tracing::debug!(from = self.floor, %direction, "car departing");
        Ok(())
    }

    /// Start the idle-homing run down to [`HOME_FLOOR`].
    pub fn depart_home(&mut self) -> Result<(), LiftError> {
        self.depart(Direction::toward(self.floor, HOME_FLOOR))?;
        self.homing = true;
        Ok(())
    }

    /// Drop the homing intent; normal request handling takes over at the
    /// next floor.
    pub fn cancel_homing(&mut self) {
        self.homing = false;
    }

    /// Position for rendering: eased between floors. Never used for
    /// decisions.
    pub fn display_position(&self) -> f64 {
        if !self.moving {
            return self.position;
        }
        let base = f64::from(self.floor);
        let leg = (self.position - base).abs().min(1.0);
        base + f64::from(self.direction.sign()) * ease_in_out(leg)
    }

    /// Advance the car by `dt`. Returns the arrival decision when a floor is
    /// reached during this step.
    ///
    /// At most one floor is reached per step; any distance past it is
    /// dropped when the position snaps.
    pub fn advance(&mut self, dt: Duration, requests: &mut RequestStore) -> Option<Arrival> {
        if !self.moving {
            return None;
        }
        let sign = self.direction.sign();
        if sign == 0 {
            tracing::warn!(floor = self.floor, "moving without a direction; stopping");
            self.stop();
            return Some(Arrival::Exhausted(self.floor));
        }

        let next = (i16::from(self.floor) + i16::from(sign))
            .clamp(i16::from(BOTTOM_FLOOR), i16::from(FLOORS));
        let next = Floor::try_from(next).unwrap_or(self.floor);
        let step = SPEED_FLOORS_PER_SEC * dt.as_secs_f64();
        let pos = (self.position + f64::from(sign) * step)
            .clamp(f64::from(BOTTOM_FLOOR), f64::from(FLOORS));
        let target = f64::from(next);
        let reached = if sign > 0 {
            pos >= target - ARRIVAL_EPSILON
        } else {
            pos <= target + ARRIVAL_EPSILON
        };
        if !reached {
            self.position = pos;
            return None;
        }
        Some(self.arrive(next, requests))
    }

    fn arrive(&mut self, floor: Floor, requests: &mut RequestStore) -> Arrival {
        self.floor = floor;
        self.position = f64::from(floor);

        // Never run off the ends of the shaft
        if floor == BOTTOM_FLOOR && self.direction == Direction::Down {
            self.direction = Direction::Up;
        } else if floor == FLOORS && self.direction == Direction::Up {
            self.direction = Direction::Down;
        }
        let dir = self.direction;

        if requests.wants_stop(floor, dir) {
            requests.clear_at_floor(floor, dir);
            self.stop();
            tracing::debug!(floor, %dir, "stopping to serve");
            return Arrival::Served(floor);
        }

        if requests.any_beyond(floor, dir) {
            return Arrival::Passed(floor);
        }

        // Last stop of this sweep is a call the other way: turn around here
        if requests.has_call(floor, dir.opposite()) {
            self.direction = dir.opposite();
            requests.clear_all_at(floor);
            self.stop();
            tracing::debug!(floor, direction = %self.direction, "reversing to serve opposite call");
            return Arrival::Served(floor);
        }

        if requests.any_beyond(floor, dir.opposite()) {
            self.direction = dir.opposite();
            tracing::debug!(floor, direction = %self.direction, "nothing ahead; reversing");
            return Arrival::Reversed(floor);
        }

        if self.homing {
            if floor == HOME_FLOOR {
                self.direction = Direction::Idle;
                self.stop();
                tracing::debug!(floor, "arrived home");
                return Arrival::Served(floor);
            }
            let toward_home = Direction::toward(floor, HOME_FLOOR);
            if toward_home == dir {
                return Arrival::Passed(floor);
            }
            self.direction = toward_home;
            return Arrival::Reversed(floor);
        }

        self.direction = Direction::Idle;
        self.stop();
        tracing::debug!(floor, "no requests left; stopping");
        Arrival::Exhausted(floor)
    }

    fn stop(&mut self) {
        self.moving = false;
        self.homing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TICK;

    /// Tick until the car stops, collecting every arrival.
    fn run_to_stop(car: &mut Car, requests: &mut RequestStore) -> Vec<Arrival> {
        let mut arrivals = Vec::new();
        for _ in 0..10_000 {
            if let Some(a) = car.advance(TICK, requests) {
                arrivals.push(a);
                if a.is_stop() {
                    return arrivals;
                }
            }
        }
        panic!("car never stopped: {arrivals:?}");
    }

    #[test]
    fn passes_floors_until_the_request() {
        let mut car = Car::at_floor(1);
        let mut r = RequestStore::from_sets([4], [], []);
        car.depart(Direction::Up).unwrap();
        let arrivals = run_to_stop(&mut car, &mut r);
        assert_eq!(
            arrivals,
            vec![Arrival::Passed(2), Arrival::Passed(3), Arrival::Served(4)]
        );
        assert_eq!(car.position(), 4.0);
        assert!(!r.has_any());
        assert!(!car.is_moving());
    }

    #[test]
    fn skips_down_call_while_climbing() {
        let mut car = Car::at_floor(2);
        let mut r = RequestStore::from_sets([], [5], [3]);
        car.depart(Direction::Up).unwrap();
        let arrivals = run_to_stop(&mut car, &mut r);
        assert_eq!(arrivals.last(), Some(&Arrival::Served(5)));
        assert!(arrivals.contains(&Arrival::Passed(3)));
        assert!(r.down_calls().contains(&3));
    }

    #[test]
    fn serves_opposite_call_at_end_of_sweep() {
        let mut car = Car::at_floor(1);
        let mut r = RequestStore::from_sets([], [], [4]);
        car.depart(Direction::Up).unwrap();
        let arrivals = run_to_stop(&mut car, &mut r);
        assert_eq!(arrivals.last(), Some(&Arrival::Served(4)));
        assert_eq!(car.direction(), Direction::Down);
        assert!(!r.has_any());
    }

    #[test]
    fn reverses_and_continues_when_work_is_behind() {
        // Left 3 going up, then the only request became floor 2
        let mut car = Car::at_floor(3);
        let mut r = RequestStore::from_sets([], [], []);
        car.depart(Direction::Up).unwrap();
        r.press(crate::types::Press::car(2), None);
        let arrivals = run_to_stop(&mut car, &mut r);
        assert_eq!(
            arrivals,
            vec![Arrival::Reversed(4), Arrival::Passed(3), Arrival::Served(2)]
        );
    }

    #[test]
    fn exhausted_run_clears_direction() {
        let mut car = Car::at_floor(1);
        let mut r = RequestStore::from_sets([], [], []);
        car.depart(Direction::Up).unwrap();
        let arrivals = run_to_stop(&mut car, &mut r);
        assert_eq!(arrivals, vec![Arrival::Exhausted(2)]);
        assert_eq!(car.direction(), Direction::Idle);
        assert_eq!(car.position(), 2.0);
    }

    #[test]
    fn top_floor_forces_reversal_and_serves_stray_up_call() {
        let mut car = Car::at_floor(5);
        let mut r = RequestStore::from_sets([], [6], []);
        car.depart(Direction::Up).unwrap();
        let arrivals = run_to_stop(&mut car, &mut r);
        assert_eq!(arrivals, vec![Arrival::Served(6)]);
        assert_eq!(car.direction(), Direction::Up);
        assert!(!r.has_any());
    }

    #[test]
    fn top_floor_down_call_is_served_after_forced_reversal() {
        let mut car = Car::at_floor(5);
        let mut r = RequestStore::from_sets([], [], [6]);
        car.depart(Direction::Up).unwrap();
        let arrivals = run_to_stop(&mut car, &mut r);
        assert_eq!(arrivals, vec![Arrival::Served(6)]);
        assert_eq!(car.direction(), Direction::Down);
    }

    #[test]
    fn homing_runs_to_floor_one() {
        let mut car = Car::at_floor(4);
        let mut r = RequestStore::new();
        car.depart_home().unwrap();
        assert!(car.is_homing());
        let arrivals = run_to_stop(&mut car, &mut r);
        assert_eq!(
            arrivals,
            vec![Arrival::Passed(3), Arrival::Passed(2), Arrival::Served(1)]
        );
        assert!(!car.is_homing());
        assert_eq!(car.direction(), Direction::Idle);
    }

    #[test]
    fn departure_contract() {
        let mut car = Car::at_floor(1);
        assert!(car.depart(Direction::Down).is_err());
        assert!(car.depart(Direction::Idle).is_err());
        car.depart(Direction::Up).unwrap();
        assert!(matches!(
            car.depart(Direction::Up),
            Err(LiftError::Contract(_))
        ));
    }

    #[test]
    fn large_step_reaches_only_the_next_floor() {
        let mut car = Car::at_floor(1);
        let mut r = RequestStore::from_sets([6], [], []);
        car.depart(Direction::Up).unwrap();
        let a = car.advance(Duration::from_secs(10), &mut r);
        assert_eq!(a, Some(Arrival::Passed(2)));
        assert_eq!(car.position(), 2.0);
    }

    #[test]
    fn one_floor_takes_two_seconds() {
        let mut car = Car::at_floor(1);
        let mut r = RequestStore::from_sets([2], [], []);
        car.depart(Direction::Up).unwrap();
        let mut ticks = 0u32;
        while car.advance(TICK, &mut r).is_none() {
            ticks += 1;
            assert!(car.position() >= 1.0 && car.position() <= 2.0);
        }
        // 2000 ms / 16 ms = 125 ticks, arrival is within epsilon of 2.0
        assert!((123..=125).contains(&ticks), "ticks = {ticks}");
    }

    #[test]
    fn display_position_eases_within_the_current_leg() {
        let mut car = Car::at_floor(2);
        assert_eq!(car.display_position(), 2.0);

        let mut r = RequestStore::from_sets([5], [], []);
        car.depart(Direction::Up).unwrap();
        let mut last = car.display_position();
        while car.is_moving() {
            car.advance(TICK, &mut r);
            let floor = f64::from(car.floor());
            let shown = car.display_position();
            if car.is_moving() {
                assert!(shown >= floor && shown <= floor + 1.0, "{shown} outside leg from {floor}");
                assert!(shown >= last, "display went backwards: {last} -> {shown}");
            }
            last = shown;
        }
        assert_eq!(car.display_position(), car.position());
        assert_eq!(car.display_position(), 5.0);

        // eased: slow start inside a leg
        let mut car = Car::at_floor(1);
        let mut r = RequestStore::from_sets([2], [], []);
        car.depart(Direction::Up).unwrap();
        for _ in 0..20 {
            car.advance(TICK, &mut r);
        }
        assert!(car.display_position() < car.position());
    }
}
