//! Live API HTTP client.
//!
//! Builds request URLs, hands them to the configured [`Transport`],
//! decodes the JSON payloads and assembles domain objects. Each operation
//! is exactly one round trip; there is no caching and no retrying.

use chrono::Local;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::domain::{Departure, Stop};

use super::convert::{departure_from_record, stop_from_record};
use super::error::KvvError;
use super::transport::{HttpTransport, Transport};
use super::types::{DeparturesPayload, StopsPayload};

/// Default base URL for the live API.
const DEFAULT_BASE_URL: &str = "https://live.kvv.de/webapp/";

/// API key issued to the public web app.
const DEFAULT_API_KEY: &str = "377d840e54b59adbe53608ba1aad70e8";

/// Default maximum number of departures per request.
pub const DEFAULT_MAX_INFOS: u32 = 10;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the live API client.
#[derive(Debug, Clone)]
pub struct KvvConfig {
    /// API key attached to every request as the `key` query parameter
    pub api_key: String,
    /// Base URL all operation paths are rooted under
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl KvvConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for KvvConfig {
    /// Config using the API key issued to the public web app.
    fn default() -> Self {
        Self::new(DEFAULT_API_KEY)
    }
}

/// Live API client.
///
/// Generic over the transport so tests can inject canned responses; the
/// default is the reqwest-backed [`HttpTransport`]. The client holds no
/// mutable state, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct KvvClient<T = HttpTransport> {
    transport: T,
    config: KvvConfig,
}

impl KvvClient<HttpTransport> {
    /// Create a client that performs real HTTP requests.
    pub fn new(config: KvvConfig) -> Result<Self, KvvError> {
        let transport = HttpTransport::new(config.timeout_secs)?;
        Ok(Self { transport, config })
    }
}

impl<T: Transport> KvvClient<T> {
    /// Create a client that performs requests through `transport`.
    pub fn with_transport(config: KvvConfig, transport: T) -> Self {
        Self { transport, config }
    }

    /// Search for stops by name.
    ///
    /// The service performs the fuzzy matching; the name is only
    /// forwarded, percent-encoded, as a path segment.
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Stop>, KvvError> {
        let url = self.build_url(&["stops", "byname", name], &[])?;
        let payload: StopsPayload = self.fetch_json(&url).await?;

        let stops = payload
            .stops
            .unwrap_or_default()
            .iter()
            .map(stop_from_record)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(stops)
    }

    /// Search for stops near a coordinate pair.
    pub async fn search_by_latlon(&self, lat: f64, lon: f64) -> Result<Vec<Stop>, KvvError> {
        let url = self.build_url(&["stops", "bylatlon", &lat.to_string(), &lon.to_string()], &[])?;
        let payload: StopsPayload = self.fetch_json(&url).await?;

        let stops = payload
            .stops
            .unwrap_or_default()
            .iter()
            .map(stop_from_record)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(stops)
    }

    /// Look up a single stop by its id.
    ///
    /// The payload for this endpoint is one bare stop object; it is
    /// returned as a one-element list to match the search operations.
    pub async fn search_by_stop_id(&self, stop_id: &str) -> Result<Vec<Stop>, KvvError> {
        let url = self.build_url(&["stops", "bystop", stop_id], &[])?;
        let record: serde_json::Value = self.fetch_json(&url).await?;

        Ok(vec![stop_from_record(&record)?])
    }

    /// Fetch upcoming departures for a stop.
    pub async fn get_departures(
        &self,
        stop_id: &str,
        max_infos: u32,
    ) -> Result<Vec<Departure>, KvvError> {
        let url = self.build_url(
            &["departures", "bystop", stop_id],
            &[("maxInfos", max_infos.to_string())],
        )?;

        self.fetch_departures(&url).await
    }

    /// Fetch upcoming departures for a stop, limited to one route.
    pub async fn get_departures_by_route(
        &self,
        stop_id: &str,
        route: &str,
        max_infos: u32,
    ) -> Result<Vec<Departure>, KvvError> {
        let url = self.build_url(
            &["departures", "byroute", route, stop_id],
            &[("maxInfos", max_infos.to_string())],
        )?;

        self.fetch_departures(&url).await
    }

    /// Fetch a departures payload and convert every record, anchored to
    /// the moment of the call.
    async fn fetch_departures(&self, url: &Url) -> Result<Vec<Departure>, KvvError> {
        let payload: DeparturesPayload = self.fetch_json(url).await?;
        let now = Local::now().naive_local();

        let departures = payload
            .departures
            .unwrap_or_default()
            .iter()
            .map(|record| departure_from_record(record, now))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(departures)
    }

    /// Build an operation URL: base, then `segments` (percent-encoded),
    /// then `params` and the API key as query parameters.
    ///
    /// The query string is assembled fresh on every call; nothing is
    /// shared between requests.
    fn build_url(&self, segments: &[&str], params: &[(&str, String)]) -> Result<Url, KvvError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| KvvError::Config(format!("invalid base URL: {e}")))?;

        url.path_segments_mut()
            .map_err(|()| KvvError::Config("base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);

        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("key", &self.config.api_key);
        }

        Ok(url)
    }

    /// Perform the round trip for `url` and decode the body as JSON.
    async fn fetch_json<P: DeserializeOwned>(&self, url: &Url) -> Result<P, KvvError> {
        debug!(path = url.path(), "requesting");

        let body = self.transport.fetch(url.as_str()).await?;

        serde_json::from_slice(&body).map_err(|e| KvvError::Json {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kvv::mock::MockTransport;
    use crate::kvv::transport::TransportFailure;

    fn client_with(mock: MockTransport) -> KvvClient<MockTransport> {
        KvvClient::with_transport(KvvConfig::new("test-key"), mock)
    }

    #[test]
    fn config_defaults() {
        let config = KvvConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_key, DEFAULT_API_KEY);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn config_builder() {
        let config = KvvConfig::new("test-key")
            .with_base_url("http://localhost:8080/api/")
            .with_timeout(5);

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, "http://localhost:8080/api/");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn client_creation() {
        assert!(KvvClient::new(KvvConfig::default()).is_ok());
    }

    #[test]
    fn build_url_appends_segments_and_key() {
        let client = client_with(MockTransport::new());

        let url = client.build_url(&["stops", "byname", "Kronenplatz"], &[]).unwrap();

        assert_eq!(url.path(), "/webapp/stops/byname/Kronenplatz");
        assert_eq!(url.query(), Some("key=test-key"));
    }

    #[test]
    fn build_url_percent_encodes_user_segments() {
        let client = client_with(MockTransport::new());

        let url = client
            .build_url(&["stops", "byname", "Durlacher Tor/KIT-Campus Süd"], &[])
            .unwrap();

        assert_eq!(
            url.path(),
            "/webapp/stops/byname/Durlacher%20Tor%2FKIT-Campus%20S%C3%BCd"
        );
    }

    #[test]
    fn build_url_orders_params_before_key() {
        let client = client_with(MockTransport::new());

        let url = client
            .build_url(
                &["departures", "bystop", "de:8212:3"],
                &[("maxInfos", "10".to_string())],
            )
            .unwrap();

        assert_eq!(url.query(), Some("maxInfos=10&key=test-key"));
    }

    #[test]
    fn build_url_handles_base_without_trailing_slash() {
        let client = KvvClient::with_transport(
            KvvConfig::new("test-key").with_base_url("http://localhost:8080/webapp"),
            MockTransport::new(),
        );

        let url = client.build_url(&["stops", "byname", "Kronenplatz"], &[]).unwrap();
        assert_eq!(url.path(), "/webapp/stops/byname/Kronenplatz");
    }

    #[test]
    fn build_url_rejects_unparseable_base() {
        let client = KvvClient::with_transport(
            KvvConfig::new("test-key").with_base_url("not a url"),
            MockTransport::new(),
        );

        let err = client.build_url(&["stops"], &[]).unwrap_err();
        assert!(matches!(err, KvvError::Config(_)));
    }

    #[tokio::test]
    async fn search_by_name_decodes_stops() {
        let mock = MockTransport::new().on(
            "/webapp/stops/byname/Kronenplatz",
            r#"{"stops": [
                {"id": "de:8212:3", "name": "Kronenplatz (U)", "lat": 49.00935, "lon": 8.40811}
            ]}"#,
        );
        let requests = mock.request_log();
        let client = client_with(mock);

        let stops = client.search_by_name("Kronenplatz").await.unwrap();

        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].name, "Kronenplatz (U)");
        assert_eq!(stops[0].stop_id, "de:8212:3");

        let seen = requests.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0],
            "https://live.kvv.de/webapp/stops/byname/Kronenplatz?key=test-key"
        );
    }

    #[tokio::test]
    async fn search_by_name_with_absent_stops_key_is_empty() {
        let mock = MockTransport::new().on("/webapp/stops/byname/Niemandsland", "{}");
        let client = client_with(mock);

        let stops = client.search_by_name("Niemandsland").await.unwrap();
        assert!(stops.is_empty());
    }

    #[tokio::test]
    async fn search_by_latlon_uses_path_segments() {
        let mock = MockTransport::new().on("/webapp/stops/bylatlon/49.0094/8.404", r#"{"stops": []}"#);
        let requests = mock.request_log();
        let client = client_with(mock);

        let stops = client.search_by_latlon(49.0094, 8.404).await.unwrap();
        assert!(stops.is_empty());

        let seen = requests.lock().unwrap();
        assert!(seen[0].contains("/stops/bylatlon/49.0094/8.404?"));
    }

    #[tokio::test]
    async fn search_by_stop_id_wraps_the_bare_record() {
        let mock = MockTransport::new().on(
            "/webapp/stops/bystop/de:8212:3",
            r#"{"id": "de:8212:3", "name": "Kronenplatz (U)", "lat": 49.00935, "lon": 8.40811}"#,
        );
        let client = client_with(mock);

        let stops = client.search_by_stop_id("de:8212:3").await.unwrap();

        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].stop_id, "de:8212:3");
    }

    #[tokio::test]
    async fn get_departures_decodes_and_passes_max_infos() {
        let mock = MockTransport::new().on(
            "/webapp/departures/bystop/de:8212:3",
            r#"{"departures": [
                {"route": "S1", "destination": "Bad Herrenalb", "direction": "2",
                 "time": "4 min", "lowfloor": true, "realtime": true,
                 "traction": "2", "stopPosition": "1"}
            ]}"#,
        );
        let requests = mock.request_log();
        let client = client_with(mock);

        let departures = client.get_departures("de:8212:3", 5).await.unwrap();

        assert_eq!(departures.len(), 1);
        assert_eq!(departures[0].route, "S1");
        assert_eq!(departures[0].raw_time, "4 min");

        let seen = requests.lock().unwrap();
        assert!(seen[0].contains("maxInfos=5"));
        assert!(seen[0].contains("key=test-key"));
    }

    #[tokio::test]
    async fn get_departures_empty_array_is_empty_sequence() {
        let mock =
            MockTransport::new().on("/webapp/departures/bystop/de:8212:3", r#"{"departures": []}"#);
        let client = client_with(mock);

        let departures = client.get_departures("de:8212:3", DEFAULT_MAX_INFOS).await.unwrap();
        assert!(departures.is_empty());
    }

    #[tokio::test]
    async fn get_departures_absent_key_is_empty_sequence() {
        let mock = MockTransport::new().on("/webapp/departures/bystop/de:8212:3", "{}");
        let client = client_with(mock);

        let departures = client.get_departures("de:8212:3", DEFAULT_MAX_INFOS).await.unwrap();
        assert!(departures.is_empty());
    }

    #[tokio::test]
    async fn one_malformed_record_fails_the_whole_operation() {
        // Strict decode: the good first record must not survive the bad
        // second one.
        let mock = MockTransport::new().on(
            "/webapp/departures/bystop/de:8212:3",
            r#"{"departures": [
                {"route": "S1", "destination": "Bad Herrenalb", "direction": "2",
                 "time": "4 min", "lowfloor": true, "realtime": true,
                 "traction": "2", "stopPosition": "1"},
                {"route": "S2", "destination": "Spöck", "direction": "1",
                 "time": "6 min", "lowfloor": true, "realtime": true,
                 "traction": "2"}
            ]}"#,
        );
        let client = client_with(mock);

        let err = client
            .get_departures("de:8212:3", DEFAULT_MAX_INFOS)
            .await
            .unwrap_err();
        assert!(matches!(err, KvvError::MalformedRecord(_)));
    }

    #[tokio::test]
    async fn unrecognized_time_fails_the_whole_operation() {
        let mock = MockTransport::new().on(
            "/webapp/departures/bystop/de:8212:3",
            r#"{"departures": [
                {"route": "S1", "destination": "Bad Herrenalb", "direction": "2",
                 "time": "later", "lowfloor": true, "realtime": true,
                 "traction": "2", "stopPosition": "1"}
            ]}"#,
        );
        let client = client_with(mock);

        let err = client
            .get_departures("de:8212:3", DEFAULT_MAX_INFOS)
            .await
            .unwrap_err();
        assert!(matches!(err, KvvError::UnrecognizedTimeFormat(_)));
        assert!(err.to_string().contains("later"));
    }

    #[tokio::test]
    async fn get_departures_by_route_builds_route_path() {
        let mock = MockTransport::new().on(
            "/webapp/departures/byroute/S1/de:8212:3",
            r#"{"departures": []}"#,
        );
        let requests = mock.request_log();
        let client = client_with(mock);

        let departures = client
            .get_departures_by_route("de:8212:3", "S1", DEFAULT_MAX_INFOS)
            .await
            .unwrap();
        assert!(departures.is_empty());

        let seen = requests.lock().unwrap();
        assert!(seen[0].contains("/departures/byroute/S1/de:8212:3?"));
    }

    #[tokio::test]
    async fn http_400_reads_as_invalid_stop_or_route() {
        let mock = MockTransport::new().on_failure(
            "/webapp/departures/byroute/S99/nowhere",
            TransportFailure {
                status: Some(400),
                message: "HTTP 400 Bad Request".to_string(),
            },
        );
        let client = client_with(mock);

        let err = client
            .get_departures_by_route("nowhere", "S99", DEFAULT_MAX_INFOS)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid stop id or route");
    }

    #[tokio::test]
    async fn http_404_reads_as_not_found() {
        let mock = MockTransport::new().on_failure(
            "/webapp/stops/bystop/nowhere",
            TransportFailure {
                status: Some(404),
                message: "HTTP 404 Not Found".to_string(),
            },
        );
        let client = client_with(mock);

        let err = client.search_by_stop_id("nowhere").await.unwrap_err();
        assert_eq!(err.to_string(), "not found");
    }

    #[tokio::test]
    async fn network_failure_surfaces_as_transport_error() {
        let mock = MockTransport::new().on_failure(
            "/webapp/stops/byname/Kronenplatz",
            TransportFailure {
                status: None,
                message: "connection timed out".to_string(),
            },
        );
        let client = client_with(mock);

        let err = client.search_by_name("Kronenplatz").await.unwrap_err();
        assert!(matches!(err, KvvError::Transport(_)));
        assert!(err.to_string().contains("connection timed out"));
    }

    #[tokio::test]
    async fn non_json_body_is_a_json_error() {
        let mock = MockTransport::new().on("/webapp/stops/byname/Kronenplatz", "<html>busy</html>");
        let client = client_with(mock);

        let err = client.search_by_name("Kronenplatz").await.unwrap_err();
        assert!(matches!(err, KvvError::Json { .. }));
    }
}
