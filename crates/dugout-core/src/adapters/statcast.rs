use time::Date;

use crate::data_source::{PitchSource, SourceError};
use crate::domain::{format_date, DateChunk, Table};
use crate::http_client::{HttpClient, HttpRequest};
use crate::source::ProviderId;

pub const DEFAULT_STATCAST_BASE_URL: &str = "https://baseballsavant.mlb.com";

/// Search filters sent with every export request: pitch-level detail rows for
/// regular season, postseason and spring games, no minimum sample size.
const SEARCH_FILTERS: &[(&str, &str)] = &[
    ("all", "true"),
    ("type", "details"),
    ("player_type", "pitcher"),
    ("hfGT", "R|PO|S|"),
    ("min_pitches", "0"),
    ("min_results", "0"),
    ("min_abs", "0"),
    ("group_by", "name"),
    ("sort_col", "pitches"),
    ("sort_order", "desc"),
];

/// Pitch-level CSV export over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPitchSource<C> {
    client: C,
    base_url: String,
    timeout_ms: u64,
}

impl<C: HttpClient> HttpPitchSource<C> {
    pub fn new(client: C, base_url: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout_ms,
        }
    }

    pub fn export_url(&self, start: Date, end: Date) -> String {
        let mut query = SEARCH_FILTERS
            .iter()
            .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>();
        query.push(format!("game_date_gt={}", format_date(start)));
        query.push(format!("game_date_lt={}", format_date(end)));
        format!(
            "{}/statcast_search/csv?{}",
            self.base_url.trim_end_matches('/'),
            query.join("&")
        )
    }
}

impl<C: HttpClient> PitchSource for HttpPitchSource<C> {
    fn pitches(&self, start: Date, end: Date) -> Result<Table, SourceError> {
        let url = self.export_url(start, end);
        tracing::debug!(provider = %ProviderId::Statcast, url = url.as_str(), "requesting export");

        let request = HttpRequest::get(&url)
            .with_header("accept", "text/csv")
            .with_timeout_ms(self.timeout_ms);
        let response = self
            .client
            .execute(request)
            .map_err(|e| SourceError::unavailable(ProviderId::Statcast, e.message()))?;
        if !response.is_success() {
            return Err(SourceError::from_status(
                ProviderId::Statcast,
                response.status,
                &url,
            ));
        }

        Table::from_csv(&response.body).map_err(|e| {
            let window = DateChunk { start, end };
            SourceError::malformed_response(
                ProviderId::Statcast,
                format!("export for {window} is not valid CSV: {e}"),
            )
        })
    }
}
