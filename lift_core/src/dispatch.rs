//! SCAN dispatch with directional call filtering.
//!
//! Given the committed direction, the current floor and the pending requests,
//! pick the floor the car should head for next. Pure; re-evaluated whenever
//! requests change, the car stops, or the direction is cleared.
//!
//! Up-calls are only answered on the way up and down-calls on the way down,
//! so the car never stops for a down-call while climbing past it. Car buttons
//! are served in either direction.

use crate::requests::RequestStore;
use crate::types::{Direction, Floor};

/// Policy for the idle branch: when the nearest serviceable request above and
/// the nearest below are equally far, go up.
pub const IDLE_TIE_BREAK: Direction = Direction::Up;

/// Next floor to target, or `None` when no request is pending.
///
/// May return `current` itself when the only pending request is here.
pub fn next_target(direction: Direction, current: Floor, requests: &RequestStore) -> Option<Floor> {
    if !requests.has_any() {
        return None;
    }
    match direction {
        Direction::Up => sweep_up(current, requests),
        Direction::Down => sweep_down(current, requests),
        Direction::Idle => idle_dispatch(current, requests),
    }
}

fn sweep_up(current: Floor, requests: &RequestStore) -> Option<Floor> {
    // Continue upward
    if let Some(f) = requests.up_floors().filter(|f| *f > current).min() {
        return Some(f);
    }
    // Nothing left above: reverse and sweep down
    if let Some(f) = requests.down_floors().filter(|f| *f < current).max() {
        return Some(f);
    }
    // Up-call stranded below us
    if let Some(f) = requests.up_floors().filter(|f| *f < current).max() {
        tracing::warn!(current, target = f, "sweeping up but only an up-call below remains");
        return Some(f);
    }
    leftover(Direction::Up, current, requests)
}

fn sweep_down(current: Floor, requests: &RequestStore) -> Option<Floor> {
    if let Some(f) = requests.down_floors().filter(|f| *f < current).max() {
        return Some(f);
    }
    if let Some(f) = requests.up_floors().filter(|f| *f > current).min() {
        return Some(f);
    }
    // Down-call stranded above us
    if let Some(f) = requests.down_floors().filter(|f| *f > current).min() {
        tracing::warn!(current, target = f, "sweeping down but only a down-call above remains");
        return Some(f);
    }
    leftover(Direction::Down, current, requests)
}

fn idle_dispatch(current: Floor, requests: &RequestStore) -> Option<Floor> {
    if requests.has_any_at(current) {
        return Some(current);
    }
    let nearest_up = requests.up_floors().filter(|f| *f > current).min();
    let nearest_down = requests.down_floors().filter(|f| *f < current).max();
    match (nearest_up, nearest_down) {
        (Some(up), Some(down)) => {
            let up_dist = up - current;
            let down_dist = current - down;
            if up_dist < down_dist || (up_dist == down_dist && IDLE_TIE_BREAK == Direction::Up) {
                Some(up)
            } else {
                Some(down)
            }
        }
        (Some(up), None) => Some(up),
        (None, Some(down)) => Some(down),
        // e.g. an up-call below with no down-call, or a down-call above
        (None, None) => nearest_any(current, requests),
    }
}

/// Requests that neither the sweep nor its reversal can pick up: a down-call
/// above while heading up (the top of the sweep), or the mirror image.
fn leftover(direction: Direction, current: Floor, requests: &RequestStore) -> Option<Floor> {
    let target = nearest_any(current, requests);
    tracing::debug!(%direction, current, ?target, "no sweep target; falling back to nearest request");
    target
}

/// Closest pending floor of any kind; ties go to the higher floor.
fn nearest_any(current: Floor, requests: &RequestStore) -> Option<Floor> {
    requests
        .all_floors()
        .min_by_key(|f| (f.abs_diff(current), std::cmp::Reverse(*f)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn store(internal: &[Floor], up: &[Floor], down: &[Floor]) -> RequestStore {
        RequestStore::from_sets(internal.iter().copied(), up.iter().copied(), down.iter().copied())
    }

    #[rstest]
    // does not stop for a down-call while ascending past it
    #[case(Direction::Up, 2, &[], &[5], &[3], Some(5))]
    // reverses when nothing remains ahead
    #[case(Direction::Up, 5, &[], &[], &[2], Some(2))]
    #[case(Direction::Up, 5, &[2], &[], &[], Some(2))]
    // stray up-call behind us
    #[case(Direction::Up, 4, &[], &[2], &[], Some(2))]
    // down-call above while heading up: go get it
    #[case(Direction::Up, 2, &[], &[], &[5], Some(5))]
    #[case(Direction::Down, 5, &[], &[2], &[4], Some(4))]
    #[case(Direction::Down, 2, &[], &[4], &[], Some(4))]
    // stray down-call above while heading down
    #[case(Direction::Down, 2, &[], &[], &[4], Some(4))]
    // up-call below while heading down
    #[case(Direction::Down, 5, &[], &[1], &[], Some(1))]
    #[case(Direction::Up, 3, &[], &[], &[], None)]
    #[case(Direction::Idle, 3, &[], &[], &[], None)]
    fn sweep_cases(
        #[case] dir: Direction,
        #[case] current: Floor,
        #[case] internal: &[Floor],
        #[case] up: &[Floor],
        #[case] down: &[Floor],
        #[case] expected: Option<Floor>,
    ) {
        let r = store(internal, up, down);
        assert_eq!(next_target(dir, current, &r), expected);
    }

    #[rstest]
    // equal distance: tie goes up
    #[case(3, &[], &[5], &[1], Some(5))]
    #[case(3, &[], &[4], &[1], Some(4))]
    #[case(3, &[], &[6], &[2], Some(2))]
    #[case(3, &[3], &[6], &[], Some(3))]
    #[case(3, &[], &[], &[3], Some(3))]
    // neither serviceable: up-call below, nearest wins
    #[case(4, &[], &[2], &[], Some(2))]
    #[case(2, &[], &[], &[5], Some(5))]
    // leftover tie prefers the higher floor
    #[case(3, &[], &[1], &[5], Some(5))]
    fn idle_cases(
        #[case] current: Floor,
        #[case] internal: &[Floor],
        #[case] up: &[Floor],
        #[case] down: &[Floor],
        #[case] expected: Option<Floor>,
    ) {
        let r = store(internal, up, down);
        assert_eq!(next_target(Direction::Idle, current, &r), expected);
    }

    #[test]
    fn car_buttons_count_in_both_sweeps() {
        let r = store(&[1, 6], &[], &[]);
        assert_eq!(next_target(Direction::Up, 3, &r), Some(6));
        assert_eq!(next_target(Direction::Down, 3, &r), Some(1));
    }
}
