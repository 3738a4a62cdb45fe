use dugout_warehouse::WarehouseError;
use thiserror::Error;

use crate::data_source::SourceError;

/// Validation errors for run inputs: configuration values, date ranges and
/// step names.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("date range start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },
    #[error("chunk_days must be at least 1, got {value}")]
    InvalidChunkDays { value: u32 },
    #[error("field '{field}' must be a YYYY-MM-DD date: '{value}'")]
    InvalidDate { field: &'static str, value: String },

    #[error(
        "unknown step '{value}', expected one of teams, players, schedule, games, batting_stats, pitching_stats, statcast"
    )]
    UnknownStep { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
    #[error("field '{field}' must be greater than zero")]
    ZeroValue { field: &'static str },
    #[error("extraction.game_types must list at least one game type and no blank entries")]
    EmptyGameTypes,
    #[error("invalid log level '{value}', expected one of TRACE, DEBUG, INFO, WARNING, ERROR")]
    InvalidLogLevel { value: String },
}

/// Anything an extraction step can fail with.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Warehouse(#[from] WarehouseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{failed} of {total} statcast chunks failed")]
    ChunksFailed { failed: usize, total: usize },
}
