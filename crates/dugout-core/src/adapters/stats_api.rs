use serde_json::Value as Json;

use crate::data_source::{Params, Resource, SourceError, StatsApi};
use crate::http_client::{HttpClient, HttpRequest};
use crate::source::ProviderId;

pub const DEFAULT_STATS_BASE_URL: &str = "https://statsapi.mlb.com/api";

/// Stats API over HTTP, decoding JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpStatsApi<C> {
    client: C,
    base_url: String,
    timeout_ms: u64,
}

impl<C: HttpClient> HttpStatsApi<C> {
    pub fn new(client: C, base_url: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout_ms,
        }
    }
}

impl<C: HttpClient> StatsApi for HttpStatsApi<C> {
    fn get(&self, resource: Resource, params: Params<'_>) -> Result<Json, SourceError> {
        let url = resource_url(&self.base_url, resource, params)?;
        tracing::debug!(
            provider = %ProviderId::StatsApi,
            %resource,
            url = url.as_str(),
            "requesting"
        );

        let request = HttpRequest::get(&url)
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);
        let response = self
            .client
            .execute(request)
            .map_err(|e| SourceError::unavailable(ProviderId::StatsApi, e.message()))?;
        if !response.is_success() {
            return Err(SourceError::from_status(
                ProviderId::StatsApi,
                response.status,
                &url,
            ));
        }

        serde_json::from_str(&response.body).map_err(|e| {
            SourceError::malformed_response(
                ProviderId::StatsApi,
                format!("{resource} response is not valid JSON: {e}"),
            )
        })
    }
}

/// Fill `{name}` path segments from `params`; the rest become the query string.
pub fn resource_url(
    base_url: &str,
    resource: Resource,
    params: Params<'_>,
) -> Result<String, SourceError> {
    let mut path = resource.path().to_owned();
    let mut query = Vec::new();
    for (name, value) in params {
        let placeholder = format!("{{{name}}}");
        if path.contains(&placeholder) {
            path = path.replace(&placeholder, &urlencoding::encode(value));
        } else {
            query.push(format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            ));
        }
    }

    if let Some(start) = path.find('{') {
        let missing = path[start..].trim_start_matches('{');
        let missing = missing.split('}').next().unwrap_or(missing);
        return Err(SourceError::invalid_request(
            ProviderId::StatsApi,
            format!("{resource} requires path parameter '{missing}'"),
        ));
    }

    let mut url = format!("{}{path}", base_url.trim_end_matches('/'));
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query.join("&"));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::{HttpError, HttpResponse};

    struct CannedClient {
        response: Result<HttpResponse, HttpError>,
        urls: RefCell<Vec<String>>,
    }

    impl HttpClient for CannedClient {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            self.urls.borrow_mut().push(request.url);
            self.response.clone()
        }
    }

    fn api(response: Result<HttpResponse, HttpError>) -> HttpStatsApi<CannedClient> {
        HttpStatsApi::new(
            CannedClient {
                response,
                urls: RefCell::new(Vec::new()),
            },
            "https://statsapi.test/api/",
            1_000,
        )
    }

    #[test]
    fn substitutes_path_params_and_encodes_query() {
        let url = resource_url(
            "https://statsapi.test/api",
            Resource::TeamRoster,
            &[
                ("teamId", String::from("147")),
                ("rosterType", String::from("fullSeason")),
                ("season", String::from("2024")),
            ],
        )
        .expect("url");
        assert_eq!(
            url,
            "https://statsapi.test/api/v1/teams/147/roster?rosterType=fullSeason&season=2024"
        );

        let url = resource_url(
            "https://statsapi.test/api",
            Resource::Schedule,
            &[("hydrate", String::from("linescore,decisions"))],
        )
        .expect("url");
        assert_eq!(
            url,
            "https://statsapi.test/api/v1/schedule?hydrate=linescore%2Cdecisions"
        );
    }

    #[test]
    fn missing_path_param_is_an_invalid_request() {
        let error = resource_url("https://statsapi.test/api", Resource::Person, &[])
            .expect_err("personId missing");
        assert_eq!(error.kind(), SourceErrorKind::InvalidRequest);
        assert!(error.message().contains("personId"));
    }

    #[test]
    fn decodes_json_bodies() {
        let api = api(Ok(HttpResponse::ok(r#"{"teams":[{"id":147}]}"#)));
        let body = api
            .get(Resource::Teams, &[("sportId", String::from("1"))])
            .expect("json");

        assert_eq!(body["teams"][0]["id"], 147);
        assert_eq!(
            api.client.urls.borrow().as_slice(),
            ["https://statsapi.test/api/v1/teams?sportId=1"]
        );
    }

    #[test]
    fn classifies_transport_status_and_decode_failures() {
        let error = api(Err(HttpError::new("connection reset")))
            .get(Resource::Teams, &[])
            .expect_err("transport");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);

        let error = api(Ok(HttpResponse {
            status: 503,
            body: String::new(),
        }))
        .get(Resource::Teams, &[])
        .expect_err("status");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);

        let error = api(Ok(HttpResponse::ok("<html>")))
            .get(Resource::Teams, &[])
            .expect_err("decode");
        assert_eq!(error.kind(), SourceErrorKind::MalformedResponse);
    }
}
