use std::fmt::{Display, Formatter};

use serde_json::Value as Json;
use time::Date;

use crate::domain::Table;
use crate::source::ProviderId;

/// Stats API resources the extraction reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Teams,
    TeamRoster,
    Person,
    Schedule,
}

impl Resource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Teams => "teams",
            Self::TeamRoster => "team_roster",
            Self::Person => "person",
            Self::Schedule => "schedule",
        }
    }

    /// URL path template; `{name}` segments are filled from request params.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Teams => "/v1/teams",
            Self::TeamRoster => "/v1/teams/{teamId}/roster",
            Self::Person => "/v1/people/{personId}",
            Self::Schedule => "/v1/schedule",
        }
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered request parameters, kept in insertion order for stable URLs.
pub type Params<'a> = &'a [(&'a str, String)];

/// Structured sports-data API.
pub trait StatsApi {
    fn get(&self, resource: Resource, params: Params<'_>) -> Result<Json, SourceError>;
}

/// Bulk pitch-level provider, queried one inclusive date range at a time.
pub trait PitchSource {
    fn pitches(&self, start: Date, end: Date) -> Result<Table, SourceError>;
}

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    MalformedResponse,
}

/// Failure of one remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    provider: ProviderId,
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::new(provider, SourceErrorKind::Unavailable, message)
    }

    pub fn rate_limited(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::new(provider, SourceErrorKind::RateLimited, message)
    }

    pub fn invalid_request(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::new(provider, SourceErrorKind::InvalidRequest, message)
    }

    pub fn malformed_response(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::new(provider, SourceErrorKind::MalformedResponse, message)
    }

    /// Classify a non-2xx HTTP status.
    pub fn from_status(provider: ProviderId, status: u16, url: &str) -> Self {
        let message = format!("HTTP {status} from {url}");
        match status {
            429 => Self::rate_limited(provider, message),
            400..=499 => Self::invalid_request(provider, message),
            _ => Self::unavailable(provider, message),
        }
    }

    fn new(provider: ProviderId, kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            provider,
            kind,
            message: message.into(),
        }
    }

    pub const fn provider(&self) -> ProviderId {
        self.provider
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::MalformedResponse => "source.malformed_response",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.provider, self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_error_kinds() {
        let url = "https://statsapi.test/v1/teams";
        assert_eq!(
            SourceError::from_status(ProviderId::StatsApi, 429, url).kind(),
            SourceErrorKind::RateLimited
        );
        assert_eq!(
            SourceError::from_status(ProviderId::StatsApi, 404, url).kind(),
            SourceErrorKind::InvalidRequest
        );
        assert_eq!(
            SourceError::from_status(ProviderId::StatsApi, 503, url).kind(),
            SourceErrorKind::Unavailable
        );
    }

    #[test]
    fn display_names_provider_and_code() {
        let error = SourceError::malformed_response(ProviderId::Statcast, "bad csv");
        assert_eq!(
            error.to_string(),
            "statcast: bad csv (source.malformed_response)"
        );
    }
}
