use thiserror::Error;

/// Top-level error type used across the entire workspace.
///
/// The sampling path itself never surfaces these: samplers collapse failures
/// to zeroed readings. They come from config handling and probe I/O.
#[derive(Debug, Error)]
pub enum PulseError {
    #[error("config error: {0}")]
    Config(String),

    #[error("system error: {0}")]
    System(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = PulseError> = std::result::Result<T, E>;
