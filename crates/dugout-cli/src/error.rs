use dugout_core::{ConfigError, HttpError, ValidationError, WarehouseError};
use thiserror::Error;

/// Startup failures mapped to exit codes. A run that starts always exits with
/// the summary's status instead.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("warehouse error: {0}")]
    Warehouse(#[from] WarehouseError),

    #[error("http client error: {0}")]
    Http(#[from] HttpError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Validation(_) => 2,
            Self::Warehouse(_) => 10,
            Self::Http(_) => 10,
            Self::Io(_) => 10,
        }
    }
}
