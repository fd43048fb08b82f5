use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum SumoError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("timeout waiting for device")]
    Timeout,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing accelerometer")]
    MissingAccelerometer,
    #[error("missing boundary sensors")]
    MissingBoundary,
    #[error("missing range finder")]
    MissingRangeFinder,
    #[error("missing drive")]
    MissingDrive,
    #[error("missing random source")]
    MissingRandom,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
