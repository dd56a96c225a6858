//! Human-readable error descriptions and structured JSON error formatting.

use lift_core::error::{AbortReason, LiftError};

use crate::cli::LAST_LIMITS;

pub fn abort_reason_name(r: AbortReason) -> &'static str {
    match r {
        AbortReason::MaxRuntime => "MaxRuntime",
        AbortReason::Shutdown => "Shutdown",
    }
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(le) = err.downcast_ref::<LiftError>() {
        return match le {
            LiftError::Abort(AbortReason::MaxRuntime) => {
                "What happened: The car did not settle before the run limit (max run time exceeded).\nLikely causes: Presses scheduled close to the limit, or a limit shorter than the trips need.\nHow to fix: Raise sim.max_run_ms in the config or pass --max-run-ms.".to_string()
            }
            LiftError::Abort(AbortReason::Shutdown) => {
                "What happened: The run was stopped before the car settled (shutdown requested).\nLikely causes: Ctrl-C or the input stream closed.\nHow to fix: Nothing to fix; start a new run.".to_string()
            }
            LiftError::Parse(msg) => format!(
                "What happened: Could not read a button press ({msg}).\nLikely causes: Typo in --press or in the scenario.\nHow to fix: Use `car N`, `up N` or `down N`, optionally followed by `@MS` for the delivery time."
            ),
            LiftError::NoSuchButton { .. } => format!(
                "What happened: {le}.\nLikely causes: Up buttons exist on every floor but the top one, down buttons on every floor but the bottom one.\nHow to fix: Pick a button that exists; presses for missing buttons are ignored."
            ),
            LiftError::Config(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/lift.toml for a sample."
            ),
            LiftError::Disconnected => {
                "What happened: Every event source stopped before the run ended.\nLikely causes: The ticker thread exited unexpectedly.\nHow to fix: Re-run with --log-level=debug for details.".to_string()
            }
            LiftError::Contract(_) => format!(
                "What happened: Internal error ({le}).\nLikely causes: A controller bug.\nHow to fix: Re-run with --log-level=debug and report the log."
            ),
        };
    }

    // String-based heuristics for errors coming from config and scenario loading
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("scenario csv must have headers") {
        return "Invalid headers in scenario CSV. Expected 'at_ms,button,floor'.".to_string();
    }

    if lower.contains("scenario rows must be ordered") || lower.contains("invalid csv row") {
        return format!(
            "What happened: The scenario CSV could not be used ({msg}).\nHow to fix: One press per row as `at_ms,button,floor` with button car|up|down, rows sorted by at_ms."
        );
    }

    if lower.contains("read config") || lower.contains("parse config") {
        return format!(
            "What happened: The config file could not be loaded ({msg}).\nHow to fix: Check the --config path and the TOML syntax."
        );
    }

    if lower.starts_with("sim.") || lower.starts_with("logging.") || lower.starts_with("press[") {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nHow to fix: Edit the TOML config and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.chain().nth(1) {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Map AbortReason (if present) to stable exit codes; other errors return 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if let Some(LiftError::Abort(reason)) = err.downcast_ref::<LiftError>() {
        return match reason {
            AbortReason::Shutdown => 3,
            AbortReason::MaxRuntime => 4,
        };
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    if let Some(LiftError::Abort(reason)) = err.downcast_ref::<LiftError>() {
        let msg = humanize(err);
        let reason_name = abort_reason_name(*reason);
        let details = LAST_LIMITS.get().map(|l| {
            json!({ "tick_ms": l.tick_ms, "max_run_ms": l.max_run_ms })
        });

        let obj = match (reason, details) {
            (AbortReason::MaxRuntime, Some(d)) => {
                json!({ "reason": reason_name, "details": d, "message": msg })
            }
            _ => json!({ "reason": reason_name, "message": msg }),
        };
        return obj.to_string();
    }

    // Generic error JSON
    json!({ "reason": "Error", "message": humanize(err) }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_codes_are_stable() {
        let max = eyre::Report::new(LiftError::Abort(AbortReason::MaxRuntime));
        let stop = eyre::Report::new(LiftError::Abort(AbortReason::Shutdown));
        assert_eq!(exit_code_for_error(&max), 4);
        assert_eq!(exit_code_for_error(&stop), 3);
        assert_eq!(exit_code_for_error(&eyre::eyre!("boom")), 1);
    }

    #[test]
    fn json_error_names_the_reason() {
        let err = eyre::Report::new(LiftError::Abort(AbortReason::MaxRuntime));
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "MaxRuntime");
        assert!(v["message"].as_str().unwrap().contains("max run time"));
    }

    #[test]
    fn header_errors_get_a_short_hint() {
        let err = eyre::eyre!("scenario CSV must have headers 'at_ms,button,floor', got: a,b");
        assert!(humanize(&err).starts_with("Invalid headers in scenario CSV"));
    }
}
