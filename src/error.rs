use thiserror::Error;

/// Startup-fatal errors.
///
/// Any of these terminates the process with a diagnostic before a single
/// request is served. Per-request failures live in
/// [`crate::proxy::RelayError`] and never reach this type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid upstream target: {0}")]
    Upstream(#[from] crate::proxy::RelayError),

    #[error("Failed to open log destination: {0}")]
    LogDestination(std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
