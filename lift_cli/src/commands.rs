//! Subcommand bodies: config mapping, scenario assembly and run execution.

use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel as xch;
use lift_config::Config;
use lift_core::consts::{FLOORS, HOME_FLOOR};
use lift_core::error::Result as CoreResult;
use lift_core::{
    Controller, Direction, DoorState, Event, Pace, Press, RunParams, Scenario, ScheduledPress,
    Ticker, run_live, settle, simulate,
};
use lift_traits::MonotonicClock;

use crate::cli::{LAST_LIMITS, RunLimits};
use crate::error_fmt::abort_reason_name;
use crate::views::{self, print_summary};

fn record_limits(params: &RunParams) {
    let _ = LAST_LIMITS.set(RunLimits {
        tick_ms: lift_core::util::as_millis_u64(params.tick),
        max_run_ms: params.max_run.map(lift_core::util::as_millis_u64),
    });
}

/// Collect presses from the config, the scenario CSV and `--press` flags.
fn build_scenario(
    cfg: &Config,
    scenario: Option<&Path>,
    presses: &[String],
) -> CoreResult<Scenario> {
    let mut scheduled: Vec<ScheduledPress> = cfg.presses.iter().map(ScheduledPress::from).collect();
    if let Some(path) = scenario {
        let rows = lift_config::load_scenario_csv(path)?;
        tracing::info!(path = %path.display(), rows = rows.len(), "scenario loaded");
        scheduled.extend(rows.iter().map(ScheduledPress::from));
    }
    for spec in presses {
        scheduled.push(spec.parse()?);
    }
    for s in &scheduled {
        if let Err(e) = s.press.check() {
            tracing::warn!(press = %s.press, at_ms = s.at_ms, error = %e, "press will be ignored");
        }
    }
    Ok(Scenario::new(scheduled))
}

pub fn run(
    cfg: &Config,
    scenario: Option<&Path>,
    presses: &[String],
    realtime: bool,
    max_run_ms: Option<u64>,
    json: bool,
) -> CoreResult<()> {
    let scenario = build_scenario(cfg, scenario, presses)?;
    let mut params = RunParams::from(&cfg.sim);
    if realtime {
        params.pace = Pace::Realtime;
    }
    if let Some(ms) = max_run_ms {
        params.max_run = Some(Duration::from_millis(ms));
    }
    record_limits(&params);

    let mut view = views::make(json);
    let mut ctrl = Controller::new();
    let snapshot = simulate(
        &mut ctrl,
        &scenario,
        view.as_mut(),
        &params,
        &MonotonicClock::new(),
    )?;
    print_summary("settled", &snapshot, json);
    Ok(())
}

/// Forward stdin lines as presses until `quit` or end of input, then raise
/// the shutdown flag.
fn spawn_stdin_reader(tx: xch::Sender<Event>, shutdown: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if matches!(line, "quit" | "q" | "exit") {
                break;
            }
            match line.parse::<Press>() {
                Ok(press) => {
                    if let Err(e) = press.check() {
                        eprintln!("{e}");
                        continue;
                    }
                    if tx.send(Event::Press(press)).is_err() {
                        return;
                    }
                }
                Err(e) => eprintln!("{e}"),
            }
        }
        tracing::debug!("input closed; requesting shutdown");
        shutdown.store(true, Ordering::Relaxed);
    });
}

pub fn interactive(cfg: &Config, max_run_ms: Option<u64>, json: bool) -> CoreResult<()> {
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = shutdown.clone();
        ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
            .map_err(|e| eyre::eyre!("install Ctrl-C handler: {e}"))?;
    }

    let params = RunParams::from(&cfg.sim).with_max_run(max_run_ms.map(Duration::from_millis));
    record_limits(&params);

    let (tx, rx) = xch::bounded(256);
    let ticker = Ticker::spawn(tx.clone(), params.tick, MonotonicClock::new());
    spawn_stdin_reader(tx, shutdown.clone());
    eprintln!("floors 1-{FLOORS}; type `car N`, `up N`, `down N` or `quit`");

    let mut view = views::make(json);
    let mut ctrl = Controller::new();
    let stopped = run_live(
        &mut ctrl,
        &rx,
        view.as_mut(),
        &shutdown,
        params.max_run,
        &MonotonicClock::new(),
    );
    drop(ticker);
    let stopped = stopped?;

    let outcome = format!("stopped ({})", abort_reason_name(stopped.reason));
    print_summary(&outcome, &stopped.snapshot, json);
    Ok(())
}

/// Serve a car call to floor 4 from power-on and check the car comes back
/// home with its doors open.
pub fn self_check(json: bool) -> CoreResult<()> {
    let scenario = Scenario::new(vec![ScheduledPress::at(0, Press::car(4))]);
    let s = settle(&scenario, Some(Duration::from_secs(60)))?;

    let home = s.current_floor == HOME_FLOOR
        && s.door_state == DoorState::Open
        && s.direction == Direction::Idle
        && !s.has_requests();
    if !home {
        eyre::bail!(
            "self-check failed: ended at floor {} with doors {} and direction {}",
            s.current_floor,
            s.door_state,
            s.direction
        );
    }

    if json {
        println!(
            "{}",
            serde_json::json!({ "self_check": "ok", "sim_ms": s.elapsed_ms })
        );
    } else {
        println!(
            "self-check ok: served floor 4 and returned home in {} ms of simulated time",
            s.elapsed_ms
        );
    }
    Ok(())
}

pub fn health() {
    let health = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "floors": FLOORS,
        "home_floor": HOME_FLOOR,
        "tick_ms": lift_core::util::as_millis_u64(lift_core::consts::TICK),
    });
    println!("{health}");
}
