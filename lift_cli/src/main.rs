mod cli;
mod commands;
mod error_fmt;
mod logging;
mod views;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let json = cli.json;
    if let Err(e) = real_main(cli) {
        if json {
            println!("{}", error_fmt::format_error_json(&e));
        } else {
            eprintln!("{}", error_fmt::humanize(&e));
        }
        std::process::exit(error_fmt::exit_code_for_error(&e));
    }
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    color_eyre::install()?;

    let cfg = match &cli.config {
        Some(path) => lift_config::load_config_file(path)?,
        None => lift_config::Config::default(),
    };
    logging::init(cli.json, cli.log_level.as_deref(), &cfg.logging)?;
    tracing::debug!(config = ?cli.config, presses = cfg.presses.len(), "config loaded");

    match cli.cmd {
        Commands::Run {
            scenario,
            presses,
            realtime,
            max_run_ms,
        } => commands::run(
            &cfg,
            scenario.as_deref(),
            &presses,
            realtime,
            max_run_ms,
            cli.json,
        ),
        Commands::Interactive { max_run_ms } => commands::interactive(&cfg, max_run_ms, cli.json),
        Commands::SelfCheck => commands::self_check(cli.json),
        Commands::Health => {
            commands::health();
            Ok(())
        }
    }
}
