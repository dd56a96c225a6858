//! Tracing setup: console layer (pretty or JSON) plus an optional rolling
//! JSON log file.

use std::path::Path;

use tracing_subscriber::layer::Layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

use crate::cli::FILE_GUARD;

const DEFAULT_LEVEL: &str = "warn";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber.
///
/// Level precedence: `RUST_LOG`, then `--log-level`, then `[logging].level`.
/// Console output goes to stderr so stdout stays machine-readable.
pub fn init(
    json: bool,
    cli_level: Option<&str>,
    logging: &lift_config::Logging,
) -> eyre::Result<()> {
    let level = cli_level
        .or(logging.level.as_deref())
        .unwrap_or(DEFAULT_LEVEL);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| eyre::eyre!("invalid log level {level:?}: {e}"))?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let console = fmt::layer().with_writer(std::io::stderr).with_target(false);
    if json {
        layers.push(console.json().boxed());
    } else {
        layers.push(console.boxed());
    }

    if let Some(file) = logging.file.as_deref() {
        layers.push(file_layer(Path::new(file), logging.rotation.as_deref())?);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| eyre::eyre!("init logging: {e}"))
}

fn file_layer(path: &Path, rotation: Option<&str>) -> eyre::Result<BoxedLayer> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| eyre::eyre!("logging.file {path:?} has no file name"))?;

    let appender = match rotation.unwrap_or("never") {
        "daily" => tracing_appender::rolling::daily(dir, name),
        "hourly" => tracing_appender::rolling::hourly(dir, name),
        _ => tracing_appender::rolling::never(dir, name),
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);
    // First init wins; later calls keep the original guard alive
    let _ = FILE_GUARD.set(guard);

    Ok(fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(writer)
        .boxed())
}
