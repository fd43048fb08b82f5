use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("bus error: {0}")]
    Bus(String),
    #[error("device timeout")]
    Timeout,
    #[error("device disconnected: {0}")]
    Disconnected(String),
}

pub type Result<T> = std::result::Result<T, HwError>;
