//! Live operation: a ticker thread and the single event consumer.
//!
//! Every producer (the ticker, a stdin reader, a UI) sends [`Event`]s into
//! one channel; [`run_live`] is the only place the controller is mutated.
//!
//! Each `Ticker` spawns exactly one thread, which is shut down and joined
//! when the `Ticker` is dropped.

use crossbeam_channel as xch;
use lift_traits::clock::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::controller::{Controller, Event};
use crate::error::{AbortReason, LiftError, Report, Result as CoreResult};
use crate::status::Snapshot;
use crate::view::CarView;

/// How long the consumer waits for an event before re-checking shutdown.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct Ticker {
    /// Shutdown flag for immediate response (atomic for lock-free check)
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Ticker {
    /// Send `Event::Tick(elapsed)` on `tx` every `period`, measured on
    /// `clock`. Elapsed time is measured between delivered ticks, so a tick
    /// that cannot be delivered is folded into the next one.
    pub fn spawn<C: Clock + Send + 'static>(
        tx: xch::Sender<Event>,
        period: Duration,
        clock: C,
    ) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let join_handle = std::thread::spawn(move || {
            let mut last = clock.now();
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("ticker received shutdown signal");
                    break;
                }
                clock.sleep(period);
                if shutdown_clone.load(Ordering::Relaxed) {
                    break;
                }

                let now = clock.now();
                let elapsed = now.saturating_duration_since(last);
                match tx.send_timeout(Event::Tick(elapsed), period) {
                    Ok(()) => last = now,
                    Err(xch::SendTimeoutError::Timeout(_)) => {
                        tracing::trace!("ticker backpressure; folding tick into the next");
                    }
                    Err(xch::SendTimeoutError::Disconnected(_)) => {
                        tracing::debug!("ticker consumer disconnected, exiting thread");
                        break;
                    }
                }
            }
            tracing::trace!("ticker thread exiting cleanly");
        });

        Self {
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Ask the thread to stop without waiting for it.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => tracing::trace!("ticker thread joined"),
                Err(e) => tracing::warn!(?e, "ticker thread panicked during shutdown"),
            }
        }
    }
}

/// How a live run ended.
#[derive(Debug, Clone, PartialEq)]
pub struct Stopped {
    pub reason: AbortReason,
    pub snapshot: Snapshot,
}

/// Consume events until shutdown or the max-run cap.
///
/// Presses are applied as they arrive; each tick advances the controller and
/// is rendered to `view`. A set `shutdown` flag ends the run with
/// [`AbortReason::Shutdown`]; `max_run` of `clock` time ends it with
/// [`AbortReason::MaxRuntime`]. Every producer hanging up is an error
/// ([`LiftError::Disconnected`]).
pub fn run_live<V, C>(
    ctrl: &mut Controller,
    rx: &xch::Receiver<Event>,
    view: &mut V,
    shutdown: &AtomicBool,
    max_run: Option<Duration>,
    clock: &C,
) -> CoreResult<Stopped>
where
    V: CarView + ?Sized,
    C: Clock + ?Sized,
{
    let start = clock.now();
    tracing::info!(max_run_ms = max_run.map(|d| d.as_millis()), "live run start");

    let reason = loop {
        if shutdown.load(Ordering::Relaxed) {
            break AbortReason::Shutdown;
        }
        if let Some(max) = max_run
            && clock.now().saturating_duration_since(start) >= max
        {
            break AbortReason::MaxRuntime;
        }

        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(Event::Tick(dt)) => {
                ctrl.tick(dt)?;
                view.render(&ctrl.snapshot());
            }
            Ok(Event::Press(press)) => {
                if ctrl.press(press)? {
                    tracing::info!(%press, "press");
                } else {
                    tracing::debug!(%press, "press had no effect");
                }
            }
            Err(xch::RecvTimeoutError::Timeout) => {}
            Err(xch::RecvTimeoutError::Disconnected) => {
                tracing::warn!("all event producers hung up");
                view.finish(&ctrl.snapshot());
                return Err(Report::new(LiftError::Disconnected));
            }
        }
    };

    let snapshot = ctrl.snapshot();
    view.finish(&snapshot);
    tracing::info!(
        %reason,
        floor = snapshot.current_floor,
        elapsed_ms = snapshot.elapsed_ms,
        "live run ended"
    );
    Ok(Stopped { reason, snapshot })
}
