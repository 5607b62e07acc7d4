//! Backend seam for the weather service: one trait covering the two remote
//! resources the core needs (current observation for a station, nearby
//! stations for a coordinate), a live HTTP implementation, and a fixture
//! implementation used when live network access is disabled.

use crate::types::geo::LatLon;
use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Per-attempt timeout applied to every request the live backend issues.
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors surfaced by a [`WeatherApi`] backend.
///
/// Transport failures are the only kind the observation fetcher treats as
/// transient; HTTP status and parse failures end the attempt immediately.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network request failed for {0}")]
    Transport(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse response from {0}")]
    Parse(String, #[source] reqwest::Error),

    #[error("no API credential configured for {0}")]
    MissingCredential(&'static str),
}

impl ApiError {
    /// Whether retrying the same request may succeed (timeouts, connection
    /// resets). Status and parse failures are not worth a retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Transport(_, _))
    }
}

/// Remote weather-service operations the core depends on. Implemented by
/// [`WundergroundApi`] for live use and [`FixtureApi`] for offline runs and
/// tests.
#[async_trait]
pub trait WeatherApi: Send + Sync {
    /// Fetch the current-observation document for a station. The document is
    /// a nested string-keyed object; the exact schema is owned by the
    /// provider.
    async fn current_observation(&self, station_id: &str) -> Result<Value, ApiError>;

    /// Fetch the raw nearby-stations payload for a coordinate.
    async fn nearby_stations(&self, location: LatLon) -> Result<Value, ApiError>;
}

/// Live backend talking to a Weather Underground style HTTP API.
pub struct WundergroundApi {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

pub const DEFAULT_BASE_URL: &str = "http://api.wunderground.com";

impl WundergroundApi {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(ATTEMPT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    async fn get_json(&self, url: String) -> Result<Value, ApiError> {
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    ApiError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    ApiError::Transport(url, e)
                });
            }
        };

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Parse(url, e))
    }
}

#[async_trait]
impl WeatherApi for WundergroundApi {
    async fn current_observation(&self, station_id: &str) -> Result<Value, ApiError> {
        let url = format!(
            "{}/weatherstation/WXCurrentObJSON.asp?ID={}",
            self.base_url, station_id
        );
        info!("Fetching current observation from {}", url);
        self.get_json(url).await
    }

    async fn nearby_stations(&self, location: LatLon) -> Result<Value, ApiError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(ApiError::MissingCredential("nearby-stations lookup"))?;
        let url = format!(
            "{}/api/{}/geolookup/q/{},{}.json",
            self.base_url, key, location.0, location.1
        );
        info!(
            "Fetching nearby stations for ({}, {})",
            location.0, location.1
        );
        self.get_json(url).await
    }
}

/// Offline backend returning canned documents. Wired in by the CLI's
/// `--offline` flag and used heavily by tests.
#[derive(Debug, Default)]
pub struct FixtureApi;

impl FixtureApi {
    pub fn observation_fixture(station_id: &str) -> Value {
        json!({
            "current_observation": {
                "credit": "Weather Underground NOAA Weather Station",
                "location": {
                    "full": "Frederick, Maryland"
                },
                "station_id": station_id,
                "observation_time": "Last Updated on 10:00 AM EDT",
                "observation_permalink": format!(
                    "http://www.wunderground.com/weatherstation/WXDailyHistory.asp?ID={station_id}"
                ),
                "temp_f": "72.0",
                "temperature_string": "72.0 F (22.2 C)",
                "wind_string": "From the WNW at 4.0 MPH",
                "dewpoint_string": "60 F (15.6 C)",
                "windchill_string": "NA",
                "pressure_string": "29.98 in (1015.2 mb)",
                "precip_1hr_string": "0.00 in (0.0 mm)",
                "precip_today_string": "0.00 in (0.0 mm)"
            }
        })
    }

    pub fn nearby_fixture() -> Value {
        json!({
            "stations": [
                { "id": "KMDIJAMS2", "neighborhood": "Ijamsville", "city": "Frederick", "state": "MD", "lat": 39.3354, "lon": -77.3194 },
                { "id": "KMDFRED5", "neighborhood": "Downtown", "city": "Frederick", "state": "MD", "lat": 39.4143, "lon": -77.4105 },
                { "id": "KMDNEWMA2", "neighborhood": "", "city": "New Market", "state": "MD", "lat": 39.3829, "lon": -77.2697 },
                { "id": "KMDMOUNT3", "neighborhood": "Summit Ridge", "city": "Mount Airy", "state": "MD", "lat": 39.3762, "lon": -77.1527 }
            ]
        })
    }
}

#[async_trait]
impl WeatherApi for FixtureApi {
    async fn current_observation(&self, station_id: &str) -> Result<Value, ApiError> {
        Ok(Self::observation_fixture(station_id))
    }

    async fn nearby_stations(&self, _location: LatLon) -> Result<Value, ApiError> {
        Ok(Self::nearby_fixture())
    }
}
