use osprey_bridge::error::{BridgeError, EngineFault};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Engine-native error detail, when the failure originated in the
    /// embedded engine.
    pub fn engine_fault(&self) -> Option<&EngineFault> {
        match self {
            CliError::Bridge(e) => e.engine_fault(),
            _ => None,
        }
    }
}
