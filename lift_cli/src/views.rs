//! Terminal renderers: one line per visible state change, pretty or JSON.

use std::collections::BTreeSet;

use lift_core::{CarView, Direction, Snapshot};
use serde_json::json;

pub fn make(json: bool) -> Box<dyn CarView> {
    if json {
        Box::new(JsonView::default())
    } else {
        Box::new(TextView::default())
    }
}

fn changed(last: Option<&Snapshot>, s: &Snapshot) -> bool {
    last.is_none_or(|l| !l.same_state(s))
}

fn arrow(d: Direction) -> &'static str {
    match d {
        Direction::Up => "up",
        Direction::Down => "down",
        Direction::Idle => "-",
    }
}

fn list(set: &BTreeSet<u8>) -> String {
    let items: Vec<String> = set.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(","))
}

#[allow(clippy::cast_precision_loss)]
fn seconds(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

#[derive(Default)]
pub struct TextView {
    last: Option<Snapshot>,
}

impl CarView for TextView {
    fn render(&mut self, s: &Snapshot) {
        if !changed(self.last.as_ref(), s) {
            return;
        }
        println!(
            "{:>8.2}s  floor {} {:<4}  pos {:.2}  doors {:<7}  car {} up {} down {}",
            seconds(s.elapsed_ms),
            s.current_floor,
            arrow(s.direction),
            s.position,
            s.door_state.as_str(),
            list(&s.internal),
            list(&s.up_calls),
            list(&s.down_calls),
        );
        self.last = Some(s.clone());
    }
}

#[derive(Default)]
pub struct JsonView {
    last: Option<Snapshot>,
}

fn snapshot_json(event: &str, s: &Snapshot) -> serde_json::Value {
    json!({
        "event": event,
        "t_ms": s.elapsed_ms,
        "floor": s.current_floor,
        "position": s.position,
        "display_position": s.display_position,
        "direction": s.direction.as_str(),
        "door": s.door_state.as_str(),
        "door_progress": s.door_progress,
        "moving": s.is_moving,
        "internal": s.internal,
        "up": s.up_calls,
        "down": s.down_calls,
    })
}

impl CarView for JsonView {
    fn render(&mut self, s: &Snapshot) {
        if !changed(self.last.as_ref(), s) {
            return;
        }
        println!("{}", snapshot_json("state", s));
        self.last = Some(s.clone());
    }
}

/// Final line of a run: how it ended and where the car is.
pub fn print_summary(outcome: &str, s: &Snapshot, json: bool) {
    if json {
        let mut v = snapshot_json("summary", s);
        v["outcome"] = json!(outcome);
        println!("{v}");
    } else {
        println!(
            "{outcome} at floor {}, doors {}, direction {} after {:.2} s",
            s.current_floor,
            s.door_state.as_str(),
            s.direction,
            seconds(s.elapsed_ms)
        );
    }
}
