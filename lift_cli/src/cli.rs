//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Effective limits used for the current run (for JSON error details).
pub static LAST_LIMITS: OnceLock<RunLimits> = OnceLock::new();

#[derive(Copy, Clone, Debug)]
pub struct RunLimits {
    pub tick_ms: u64,
    pub max_run_ms: Option<u64>,
}

#[derive(Parser, Debug)]
#[command(name = "lift", version, about = "Single-car elevator dispatch simulator")]
pub struct Cli {
    /// Path to config TOML (typed); built-in defaults when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print state changes, summaries and logs as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG wins when set
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay scripted presses on simulated time until the car settles
    Run {
        /// Scenario CSV with header `at_ms,button,floor`
        #[arg(long, value_name = "FILE")]
        scenario: Option<PathBuf>,
        /// Extra press, e.g. `car 4` or `down 6@1500` (repeatable)
        #[arg(long = "press", value_name = "SPEC")]
        presses: Vec<String>,
        /// Sleep one tick per step so the run plays out in real time
        #[arg(long, action = ArgAction::SetTrue)]
        realtime: bool,
        /// Override sim.max_run_ms (simulated milliseconds)
        #[arg(long, value_name = "MS")]
        max_run_ms: Option<u64>,
    },
    /// Drive the car live from stdin (`car 4`, `up 2`, `quit`)
    Interactive {
        /// Stop after this many wall-clock milliseconds
        #[arg(long, value_name = "MS")]
        max_run_ms: Option<u64>,
    },
    /// Run the reference trip headless and verify where the car ends up
    SelfCheck,
    /// Health check for operational monitoring
    Health,
}
