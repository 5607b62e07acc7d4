//! Nearby-station lookup and the candidate ranking policy.
//!
//! The ranking rule: candidates are sorted ascending by kilometer distance
//! and assigned sequential markers starting at 'A'. Selection stops at the
//! marker alphabet (26), at the candidate cap (10), or at the first
//! candidate that is both beyond 10 km and past the guaranteed minimum of
//! 3 already-accepted stations. The minimum is checked with strict
//! greater-than, so a 4th station may be accepted even when everything is
//! beyond 10 km; the 5th far station is cut.

use crate::api::WeatherApi;
use crate::locate::cache::LocationCache;
use crate::locate::error::LocateError;
use crate::locate::geocode::Geocoder;
use crate::types::geo::LatLon;
use crate::types::station::{CandidateStation, GeocodeResult};
use chrono::Utc;
use log::{debug, info};
use ordered_float::OrderedFloat;
use serde_json::Value;
use std::sync::Arc;

/// Hard cap on returned candidates.
pub const MAX_STATIONS: usize = 10;

/// Number of stations accepted regardless of distance (plus one, per the
/// strict-greater boundary).
pub const MIN_STATIONS: usize = 3;

/// Distance threshold beyond which stations past the minimum are cut.
pub const MAX_DISTANCE_KM: f64 = 10.0;

/// Size of the marker alphabet ('A'..='Z').
pub const MARKER_ALPHABET: usize = 26;

/// Finds and ranks observation stations near a geocoded address, caching
/// raw lookups per canonical address.
pub struct StationLocator {
    api: Arc<dyn WeatherApi>,
    geocoder: Arc<dyn Geocoder>,
    cache: LocationCache,
}

impl StationLocator {
    pub fn new(api: Arc<dyn WeatherApi>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self::with_cache(api, geocoder, LocationCache::default())
    }

    pub fn with_cache(
        api: Arc<dyn WeatherApi>,
        geocoder: Arc<dyn Geocoder>,
        cache: LocationCache,
    ) -> Self {
        Self {
            api,
            geocoder,
            cache,
        }
    }

    pub fn cache(&self) -> &LocationCache {
        &self.cache
    }

    /// Resolve a free-text address. Delegates to the geocoding backend; a
    /// provider "no match" surfaces as [`LocateError::AddressNotFound`].
    pub async fn geocode(&self, address: &str) -> Result<GeocodeResult, LocateError> {
        self.geocoder.geocode(address).await
    }

    /// Produce the ranked candidate list for a geocoded search point.
    ///
    /// A fresh cache entry for the canonical address short-circuits the
    /// network lookup and leaves its timestamp untouched; otherwise the
    /// nearby-stations endpoint is queried and the raw payload cached.
    pub async fn find_nearby(
        &mut self,
        geocoded: &GeocodeResult,
    ) -> Result<Vec<CandidateStation>, LocateError> {
        let address = geocoded.formatted_address.as_str();
        let now = Utc::now();

        let payload = if let Some(entry) = self.cache.fresh(address, now) {
            debug!("Reusing cached station lookup for '{}'", address);
            entry.payload.clone()
        } else {
            info!("Looking up stations near '{}'", address);
            let payload = self.api.nearby_stations(geocoded.location).await?;
            self.cache.insert(address, payload.clone(), now);
            payload
        };

        let parsed = parse_candidates(&payload, geocoded.location)?;
        Ok(rank_candidates(parsed))
    }

    /// Evict the cached lookup for an address (user refresh or history
    /// deletion). Returns whether an entry existed.
    pub fn invalidate(&mut self, address: &str) -> bool {
        self.cache.invalidate(address)
    }
}

/// Parse the raw nearby-stations payload into unranked candidates with
/// distances measured from the search point. Stations without an id or
/// coordinates are skipped; absent label components are omitted rather than
/// rendered empty. Markers are assigned later by the ranking pass.
pub fn parse_candidates(
    payload: &Value,
    origin: LatLon,
) -> Result<Vec<CandidateStation>, LocateError> {
    let stations = payload
        .get("stations")
        .and_then(Value::as_array)
        .ok_or_else(|| LocateError::MalformedPayload("missing 'stations' array".to_string()))?;

    let mut candidates = Vec::with_capacity(stations.len());
    for station in stations {
        let Some(id) = station.get("id").and_then(Value::as_str) else {
            debug!("Skipping station entry without id");
            continue;
        };
        let lat = station.get("lat").and_then(Value::as_f64);
        let lon = station.get("lon").and_then(Value::as_f64);
        let (Some(lat), Some(lon)) = (lat, lon) else {
            debug!("Skipping station {} without coordinates", id);
            continue;
        };
        let location = LatLon(lat, lon);

        let place = composite_place(station);
        let distance_km = station
            .get("distance_km")
            .and_then(Value::as_f64)
            .unwrap_or_else(|| origin.distance_km(&location));
        let distance_mi = station
            .get("distance_mi")
            .and_then(Value::as_f64)
            .unwrap_or_else(|| origin.distance_mi(&location));

        candidates.push(CandidateStation {
            id: id.to_string(),
            place,
            marker: ' ',
            location,
            distance_km,
            distance_mi,
        });
    }
    Ok(candidates)
}

/// Join neighborhood, city, and state, skipping components that are absent
/// or empty.
fn composite_place(station: &Value) -> String {
    ["neighborhood", "city", "state"]
        .iter()
        .filter_map(|key| station.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Sort ascending by kilometer distance, then walk the list applying the
/// selection policy and assigning sequential markers.
pub fn rank_candidates(mut candidates: Vec<CandidateStation>) -> Vec<CandidateStation> {
    candidates.sort_by_key(|c| OrderedFloat(c.distance_km));

    let mut chosen: Vec<CandidateStation> = Vec::new();
    for mut candidate in candidates {
        if chosen.len() >= MAX_STATIONS || chosen.len() >= MARKER_ALPHABET {
            break;
        }
        if candidate.distance_km > MAX_DISTANCE_KM && chosen.len() > MIN_STATIONS {
            break;
        }
        candidate.marker = (b'A' + chosen.len() as u8) as char;
        chosen.push(candidate);
    }
    chosen
}
