#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and scenario parsing for the lift simulator.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Scenario CSV loader enforces headers and checks that scripted presses
//!   are listed in time order.
//!
//! Car physics and door timings are not configurable here; they are fixed
//! constants in `lift_core::consts`.
use serde::Deserialize;

/// Which physical button a scripted press targets.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ButtonName {
    /// Floor-selection button inside the car.
    Car,
    /// Hall call button pointing up.
    Up,
    /// Hall call button pointing down.
    Down,
}

/// One scripted button press.
///
/// Used both for `[[press]]` tables in TOML and for scenario CSV rows.
///
/// Expected CSV headers:
/// at_ms,button,floor
///
/// Example:
/// at_ms,button,floor
/// 0,car,4
/// 1500,down,6
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PressRow {
    /// Simulated time at which the press is delivered.
    pub at_ms: u64,
    pub button: ButtonName,
    pub floor: u8,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimCfg {
    /// Fixed simulation step in milliseconds (~60 Hz by default).
    pub tick_ms: u64,
    /// Abort the run when the car has not settled after this much simulated time.
    pub max_run_ms: u64,
    /// Sleep one tick per step instead of running as fast as possible.
    pub realtime: bool,
}

impl Default for SimCfg {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            max_run_ms: 300_000,
            realtime: false,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub sim: SimCfg,
    pub logging: Logging,
    /// Scripted presses, delivered in `at_ms` order regardless of file order.
    #[serde(rename = "press")]
    pub presses: Vec<PressRow>,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read and parse a TOML config file, then validate it.
pub fn load_config_file(path: &std::path::Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load scripted presses from a CSV file with the exact header `at_ms,button,floor`.
pub fn load_scenario_csv(path: &std::path::Path) -> eyre::Result<Vec<PressRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open scenario CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["at_ms", "button", "floor"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "scenario CSV must have headers 'at_ms,button,floor', got: {}",
            actual.join(",")
        );
    }

    let mut rows: Vec<PressRow> = Vec::new();
    for (idx, rec) in rdr.deserialize::<PressRow>().enumerate() {
        let row = rec.map_err(|e| eyre::eyre!("invalid CSV row {}: {}", idx + 2, e))?;
        if let Some(prev) = rows.last()
            && row.at_ms < prev.at_ms
        {
            eyre::bail!(
                "scenario rows must be ordered by at_ms (row {} at {} ms follows {} ms)",
                idx + 2,
                row.at_ms,
                prev.at_ms
            );
        }
        if row.floor == 0 {
            eyre::bail!("invalid CSV row {}: floor must be >= 1", idx + 2);
        }
        rows.push(row);
    }

    Ok(rows)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Sim
        if self.sim.tick_ms == 0 {
            eyre::bail!("sim.tick_ms must be >= 1");
        }
        if self.sim.tick_ms > 1000 {
            eyre::bail!("sim.tick_ms is unreasonably large (>1s)");
        }
        if self.sim.max_run_ms == 0 {
            eyre::bail!("sim.max_run_ms must be >= 1");
        }
        if self.sim.max_run_ms < self.sim.tick_ms {
            eyre::bail!("sim.max_run_ms must cover at least one tick");
        }

        // Logging
        if let Some(rotation) = self.logging.rotation.as_deref()
            && !matches!(rotation, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rotation:?}");
        }

        // Presses
        for (i, p) in self.presses.iter().enumerate() {
            if p.floor == 0 {
                eyre::bail!("press[{i}].floor must be >= 1");
            }
        }

        Ok(())
    }
}
