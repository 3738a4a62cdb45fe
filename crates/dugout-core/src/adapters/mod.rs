mod statcast;
mod stats_api;

pub use statcast::{HttpPitchSource, DEFAULT_STATCAST_BASE_URL};
pub use stats_api::{resource_url, HttpStatsApi, DEFAULT_STATS_BASE_URL};
