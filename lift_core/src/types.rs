//! Plain value types shared by the request store, state machines and views.

use std::fmt;
use std::str::FromStr;

use crate::consts::{BOTTOM_FLOOR, FLOORS};
use crate::error::LiftError;

/// A floor number in `1..=FLOORS`.
pub type Floor = u8;

/// Committed travel direction of the car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Up,
    Down,
    /// No committed direction (idle, or cleared after the last request).
    #[default]
    Idle,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Idle => Direction::Idle,
        }
    }

    /// +1 for up, -1 for down, 0 when idle.
    pub fn sign(self) -> i8 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
            Direction::Idle => 0,
        }
    }

    /// Direction of travel needed to get from `from` to `to`.
    pub fn toward(from: Floor, to: Floor) -> Self {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Direction::Up,
            std::cmp::Ordering::Less => Direction::Down,
            std::cmp::Ordering::Equal => Direction::Idle,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Idle => "none",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Door cycle state. The car may only move while `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorState {
    Closed,
    Opening,
    Open,
    Closing,
}

impl DoorState {
    pub fn as_str(self) -> &'static str {
        match self {
            DoorState::Closed => "CLOSED",
            DoorState::Opening => "OPENING",
            DoorState::Open => "OPEN",
            DoorState::Closing => "CLOSING",
        }
    }
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Which button produced a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Floor-selection button inside the car.
    Car,
    HallUp,
    HallDown,
}

impl Button {
    pub fn as_str(self) -> &'static str {
        match self {
            Button::Car => "car",
            Button::HallUp => "up",
            Button::HallDown => "down",
        }
    }
}

/// A button press event coming from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Press {
    pub button: Button,
    pub floor: Floor,
}

impl Press {
    pub fn car(floor: Floor) -> Self {
        Self {
            button: Button::Car,
            floor,
        }
    }

    pub fn up(floor: Floor) -> Self {
        Self {
            button: Button::HallUp,
            floor,
        }
    }

    pub fn down(floor: Floor) -> Self {
        Self {
            button: Button::HallDown,
            floor,
        }
    }

    /// Whether this button physically exists: no up-call on the top floor and
    /// no down-call on the bottom floor.
    pub fn is_valid(&self) -> bool {
        match self.button {
            Button::Car => (BOTTOM_FLOOR..=FLOORS).contains(&self.floor),
            Button::HallUp => (BOTTOM_FLOOR..FLOORS).contains(&self.floor),
            Button::HallDown => (BOTTOM_FLOOR + 1..=FLOORS).contains(&self.floor),
        }
    }

    /// Like [`Press::is_valid`], but says which range was violated.
    pub fn check(&self) -> Result<(), LiftError> {
        if self.is_valid() {
            return Ok(());
        }
        Err(LiftError::NoSuchButton {
            button: self.button.as_str(),
            floor: self.floor,
        })
    }
}

impl fmt::Display for Press {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.button.as_str(), self.floor)
    }
}

/// Parses `car 4`, `up:3`, `d 5` and similar forms.
///
/// Only the shape is checked here; whether the button exists on that floor is
/// left to [`Press::is_valid`].
impl FromStr for Press {
    type Err = LiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s
            .split(|c: char| c.is_whitespace() || c == ':')
            .filter(|p| !p.is_empty());
        let (Some(word), Some(num), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(LiftError::Parse(format!(
                "expected `<car|up|down> <floor>`, got {s:?}"
            )));
        };
        let floor: Floor = num
            .parse()
            .map_err(|_| LiftError::Parse(format!("floor {num:?} is not a number")))?;
        let button = match word.to_ascii_lowercase().as_str() {
            "car" | "cab" | "c" => Button::Car,
            "up" | "u" => Button::HallUp,
            "down" | "d" => Button::HallDown,
            other => return Err(LiftError::Parse(format!("unknown button {other:?}"))),
        };
        Ok(Press { button, floor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_spellings() {
        assert_eq!("car 4".parse::<Press>().unwrap(), Press::car(4));
        assert_eq!("up:3".parse::<Press>().unwrap(), Press::up(3));
        assert_eq!("  D   5 ".parse::<Press>().unwrap(), Press::down(5));
    }

    #[test]
    fn rejects_garbage() {
        assert!("car".parse::<Press>().is_err());
        assert!("car four".parse::<Press>().is_err());
        assert!("lift 2".parse::<Press>().is_err());
        assert!("car 2 3".parse::<Press>().is_err());
    }

    #[test]
    fn hall_buttons_exist_only_where_they_make_sense() {
        assert!(Press::up(1).is_valid());
        assert!(!Press::up(FLOORS).is_valid());
        assert!(!Press::down(1).is_valid());
        assert!(Press::down(FLOORS).is_valid());
        assert!(!Press::car(0).is_valid());
        assert!(!Press::car(FLOORS + 1).is_valid());
    }

    #[test]
    fn check_names_the_missing_button() {
        let err = Press::down(1).check().unwrap_err();
        assert_eq!(err.to_string(), "there is no down button on floor 1");
        assert!(Press::car(3).check().is_ok());
    }

    #[test]
    fn toward_and_opposite() {
        assert_eq!(Direction::toward(2, 5), Direction::Up);
        assert_eq!(Direction::toward(5, 2), Direction::Down);
        assert_eq!(Direction::toward(3, 3), Direction::Idle);
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Idle.opposite(), Direction::Idle);
    }
}
