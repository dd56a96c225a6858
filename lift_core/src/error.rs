use thiserror::Error;

/// Why a run was stopped before the car settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// Simulated time ran past the configured cap.
    MaxRuntime,
    /// Shutdown was requested (Ctrl-C, input closed).
    Shutdown,
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbortReason::MaxRuntime => f.write_str("max run time exceeded"),
            AbortReason::Shutdown => f.write_str("shutdown requested"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LiftError {
    #[error("there is no {button} button on floor {floor}")]
    NoSuchButton { button: &'static str, floor: u8 },
    #[error("invalid button press: {0}")]
    Parse(String),
    /// Sequencing bug: a run was started while another one was active.
    #[error("contract violation: {0}")]
    Contract(&'static str),
    #[error("run aborted: {0}")]
    Abort(AbortReason),
    #[error("event channel disconnected")]
    Disconnected,
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
