//! Entur GraphQL HTTP client.
//!
//! Queries the JourneyPlanner API for realtime stop information and the
//! stop-place API for name searches. Entur asks every client to identify
//! itself with `ET-Client-Name` and `ET-Client-Id` headers.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use super::error::EnturError;
use super::types::{StopResponse, StopSearchResponse};

/// Default JourneyPlanner endpoint.
const DEFAULT_JOURNEY_PLANNER_URL: &str = "https://api.entur.io/journey-planner/v2/graphql";

/// Default stop-place registry endpoint.
const DEFAULT_STOP_PLACES_URL: &str = "https://api.entur.io/stop-places/v1/graphql";

/// Default client name sent in `ET-Client-Name`.
const DEFAULT_CLIENT_NAME: &str = "ruterstop - stigok/ruterstop";

/// Requests taking longer than this fail.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// How many seconds ahead to ask for calls.
const TIME_RANGE_SECS: u32 = 72100;

/// How many calls to ask for.
const NUMBER_OF_DEPARTURES: u32 = 20;

/// How many stop places a name search returns at most.
const SEARCH_SIZE: u32 = 250;

/// Source of raw stop documents.
///
/// Implemented by the live [`EnturClient`] and by
/// [`MockEnturClient`](super::MockEnturClient) for offline use.
pub trait StopFetcher: Send + Sync + 'static {
    /// Fetch realtime departure data for a numeric stop place id.
    fn fetch_stop(
        &self,
        stop_id: u32,
    ) -> impl Future<Output = Result<StopResponse, EnturError>> + Send;
}

/// Configuration for the Entur client.
#[derive(Debug, Clone)]
pub struct EnturConfig {
    /// Value of the `ET-Client-Name` header
    pub client_name: String,
    /// Value of the `ET-Client-Id` header
    pub client_id: String,
    /// JourneyPlanner GraphQL endpoint
    pub journey_planner_url: String,
    /// Stop-place GraphQL endpoint
    pub stop_places_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl EnturConfig {
    /// Create a config with production endpoints, identifying as `client_id`.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            client_id: client_id.into(),
            journey_planner_url: DEFAULT_JOURNEY_PLANNER_URL.to_string(),
            stop_places_url: DEFAULT_STOP_PLACES_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom JourneyPlanner URL (for testing).
    pub fn with_journey_planner_url(mut self, url: impl Into<String>) -> Self {
        self.journey_planner_url = url.into();
        self
    }

    /// Set a custom stop-place URL.
    pub fn with_stop_places_url(mut self, url: impl Into<String>) -> Self {
        self.stop_places_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for EnturConfig {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"))
    }
}

/// Entur API client.
#[derive(Debug, Clone)]
pub struct EnturClient {
    http: reqwest::Client,
    journey_planner_url: String,
    stop_places_url: String,
}

impl EnturClient {
    /// Create a new client with the given configuration.
    pub fn new(config: EnturConfig) -> Result<Self, EnturError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("et-client-name"),
            header_value(&config.client_name)?,
        );
        headers.insert(
            HeaderName::from_static("et-client-id"),
            header_value(&config.client_id)?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            journey_planner_url: config.journey_planner_url,
            stop_places_url: config.stop_places_url,
        })
    }

    /// Query the JourneyPlanner for upcoming calls at a stop place.
    ///
    /// See the query format at <https://api.entur.io/journey-planner/v2/ide/>.
    pub async fn get_realtime_stop(&self, stop_id: u32) -> Result<StopResponse, EnturError> {
        debug!(stop_id, "Requesting fresh data from API");
        self.post_query(&self.journey_planner_url, &stop_query(stop_id))
            .await
    }

    /// Search the stop-place registry by name.
    pub async fn search_stops(&self, name: &str) -> Result<StopSearchResponse, EnturError> {
        debug!(query = name, "Searching for stop by name");
        self.post_query(&self.stop_places_url, &search_query(name))
            .await
    }

    async fn post_query<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &str,
    ) -> Result<T, EnturError> {
        let response = self
            .http
            .post(url)
            .json(&json!({ "query": query, "variables": {} }))
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnturError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| EnturError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl StopFetcher for EnturClient {
    async fn fetch_stop(&self, stop_id: u32) -> Result<StopResponse, EnturError> {
        self.get_realtime_stop(stop_id).await
    }
}

fn header_value(value: &str) -> Result<HeaderValue, EnturError> {
    HeaderValue::from_str(value).map_err(|_| EnturError::InvalidHeader(value.to_string()))
}

/// GraphQL query for the next calls at a stop place.
fn stop_query(stop_id: u32) -> String {
    format!(
        r#"{{
  stopPlace(id: "NSR:StopPlace:{stop_id}") {{
    name
    estimatedCalls(timeRange: {TIME_RANGE_SECS}, numberOfDepartures: {NUMBER_OF_DEPARTURES}) {{
      expectedArrivalTime
      realtime
      destinationDisplay {{
        frontText
      }}
      serviceJourney {{
        directionType
        line {{
          publicCode
        }}
      }}
    }}
  }}
}}"#
    )
}

/// GraphQL query for stop places matching a name.
fn search_query(name: &str) -> String {
    // A JSON string literal is also a valid GraphQL string literal.
    let name = serde_json::Value::from(name).to_string();
    format!(
        r#"{{
  stopPlace(size: {SEARCH_SIZE}, query: {name}) {{
    id
    topographicPlace {{
      name {{
        value
      }}
      parentTopographicPlace {{
        name {{
          value
        }}
      }}
    }}
    name {{
      value
    }}
  }}
}}"#
    )
}
