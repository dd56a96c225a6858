#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Single-car elevator dispatch controller (presentation-agnostic).
//!
//! This crate decides what the car does and when. Rendering goes through the
//! `CarView` trait and time comes in as ticks, so the same controller runs in
//! deterministic simulations, in the live runner and in tests.
//!
//! ## Architecture
//!
//! - **Requests**: car buttons, up-calls and down-calls (`requests` module)
//! - **Dispatch**: SCAN-style choice of the next target floor (`dispatch`)
//! - **Motion**: position integration and per-floor stop/continue/reverse
//!   decisions (`motion`)
//! - **Door**: opening, dwell and closing runs (`door`)
//! - **Homing**: cancelable deferred return to the home floor (`timer`)
//! - **Controller**: owns all of the above; one `reconcile` step after every
//!   event (`controller`)
//! - **Runtime**: fixed-tick simulation (`sim`) and threaded live runner
//!   (`runner`)
//!
//! ## Units
//!
//! Positions are in floors (`1.0` is the bottom floor). Controller time is
//! kept in whole milliseconds; motion integrates the exact tick duration.

pub mod config;
pub mod consts;
pub mod controller;
pub mod conversions;
pub mod dispatch;
pub mod door;
pub mod error;
pub mod mocks;
pub mod motion;
pub mod requests;
pub mod runner;
pub mod sim;
pub mod status;
pub mod timer;
pub mod types;
pub mod util;
pub mod view;

pub use config::{Pace, RunParams};
pub use controller::{Controller, Event};
pub use error::{AbortReason, LiftError, Result};
pub use requests::RequestStore;
pub use runner::{Stopped, Ticker, run_live};
pub use sim::{Scenario, ScheduledPress, settle, simulate};
pub use status::Snapshot;
pub use types::{Button, Direction, DoorState, Floor, Press};
pub use view::CarView;
