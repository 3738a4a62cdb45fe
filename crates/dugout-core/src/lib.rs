//! # Dugout Core
//!
//! Extraction engine that lands MLB Stats API and Statcast data in the raw
//! warehouse schema.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | HTTP-backed Stats API and Statcast sources |
//! | [`config`] | YAML run configuration and validation |
//! | [`data_source`] | Source traits, resources and structured source errors |
//! | [`domain`] | Date chunking, JSON record access and CSV tables |
//! | [`error`] | Validation and step errors |
//! | [`http_client`] | HTTP client abstraction |
//! | [`orchestrator`] | Step registry filtering, execution and run summary |
//! | [`retry`] | Exponential backoff around remote calls |
//! | [`source`] | Provider identifiers |
//! | [`steps`] | The seven extraction steps |
//! | [`throttling`] | Fixed-delay pacing and the sleeper seam |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / Config   │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Orchestrator   │────▶│ Extraction Steps │
//! └─────────────────┘     └────────┬─────────┘
//!                                  │
//!          ┌───────────────────────┼──────────────────────┐
//!          ▼                       ▼                      ▼
//! ┌─────────────────┐     ┌──────────────────┐   ┌─────────────────┐
//! │ Rate limit +    │────▶│ Stats API /      │   │ Warehouse       │
//! │ retry           │     │ Statcast sources │   │ (DuckDB)        │
//! └─────────────────┘     └──────────────────┘   └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! A failing step never aborts the run; its error is recorded in the
//! [`RunSummary`] and the next step starts.
//!
//! ```rust
//! use dugout_core::{SourceError, SourceErrorKind};
//!
//! fn is_transient(error: &SourceError) -> bool {
//!     matches!(
//!         error.kind(),
//!         SourceErrorKind::Unavailable | SourceErrorKind::RateLimited
//!     )
//! }
//! ```

pub mod adapters;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod orchestrator;
pub mod retry;
pub mod source;
pub mod steps;
pub mod throttling;

// Adapter implementations
pub use adapters::{HttpPitchSource, HttpStatsApi};

// Configuration
pub use config::{Config, ConfigError, DEFAULT_CONFIG_PATH};

// Data source traits and types
pub use data_source::{PitchSource, Resource, SourceError, SourceErrorKind, StatsApi};

// Domain models
pub use domain::{DateChunk, DateRange, Record, Table};

// Error types
pub use error::{StepError, ValidationError};

// Warehouse (re-exported from dugout-warehouse)
pub use dugout_warehouse::{Row, Value, Warehouse, WarehouseConfig, WarehouseError};

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

// Orchestration
pub use orchestrator::{
    ExtractionStep, Orchestrator, RunPlan, RunSummary, StepName, StepResult, StepStatus,
};

// Retry logic
pub use retry::{with_retry, RetryPolicy};

// Source identifiers
pub use source::ProviderId;

// Steps
pub use steps::{registry, StepContext};

// Throttling
pub use throttling::{with_rate_limit, RateLimiter, RecordingSleeper, Sleeper, ThreadSleeper};
