//! Free-text address resolution behind the [`Geocoder`] trait: a live
//! Google-style implementation and a fixture for offline runs.

use crate::api::{ApiError, ATTEMPT_TIMEOUT};
use crate::locate::error::LocateError;
use crate::types::geo::LatLon;
use crate::types::station::GeocodeResult;
use async_trait::async_trait;
use log::info;
use reqwest::Client;
use serde_json::Value;

/// Resolves free-text addresses to coordinates plus a canonical formatted
/// address. No retry policy: a failed geocode simply ends the search.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult, LocateError>;
}

pub const DEFAULT_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Live geocoder speaking the Google Geocoding API JSON dialect.
pub struct GoogleGeocoder {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleGeocoder {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_GEOCODE_URL, api_key)
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

    fn parse_response(address: &str, doc: Value) -> Result<GeocodeResult, LocateError> {
        let status = doc
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| LocateError::GeocodeMalformed(address.to_string()))?;

        match status {
            "OK" => {}
            "ZERO_RESULTS" | "INVALID_REQUEST" => {
                return Err(LocateError::AddressNotFound(address.to_string()))
            }
            other => {
                return Err(LocateError::GeocodeProvider {
                    address: address.to_string(),
                    status: other.to_string(),
                })
            }
        }

        let result = doc
            .get("results")
            .and_then(Value::as_array)
            .and_then(|r| r.first())
            .ok_or_else(|| LocateError::AddressNotFound(address.to_string()))?;

        let formatted = result
            .get("formatted_address")
            .and_then(Value::as_str)
            .ok_or_else(|| LocateError::GeocodeMalformed(address.to_string()))?;
        let location = result
            .pointer("/geometry/location")
            .ok_or_else(|| LocateError::GeocodeMalformed(address.to_string()))?;
        let lat = location.get("lat").and_then(Value::as_f64);
        let lng = location.get("lng").and_then(Value::as_f64);
        let (Some(lat), Some(lng)) = (lat, lng) else {
            return Err(LocateError::GeocodeMalformed(address.to_string()));
        };

        Ok(GeocodeResult {
            location: LatLon(lat, lng),
            formatted_address: formatted.to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult, LocateError> {
        info!("Geocoding '{}'", address);
        let mut query: Vec<(&str, &str)> = vec![("address", address)];
        if let Some(key) = self.api_key.as_deref() {
            query.push(("key", key));
        }
        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| ApiError::Transport(self.base_url.clone(), e))?;
        let response = response.error_for_status().map_err(|e| {
            if let Some(status) = e.status() {
                ApiError::HttpStatus {
                    url: self.base_url.clone(),
                    status,
                    source: e,
                }
            } else {
                ApiError::Transport(self.base_url.clone(), e)
            }
        })?;
        let doc = response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Parse(self.base_url.clone(), e))?;

        Self::parse_response(address, doc)
    }
}

/// Offline geocoder: resolves everything to the fixture search point unless
/// the address is blank, which reports the not-found outcome.
#[derive(Debug, Default)]
pub struct FixtureGeocoder;

impl FixtureGeocoder {
    pub const FIXTURE_POINT: LatLon = LatLon(39.4143, -77.4105);
    pub const FIXTURE_ADDRESS: &'static str = "100 Main St, Frederick, MD 21701, USA";
}

#[async_trait]
impl Geocoder for FixtureGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult, LocateError> {
        if address.trim().is_empty() {
            return Err(LocateError::AddressNotFound(address.to_string()));
        }
        Ok(GeocodeResult {
            location: Self::FIXTURE_POINT,
            formatted_address: Self::FIXTURE_ADDRESS.to_string(),
        })
    }
}
