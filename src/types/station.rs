//! Value types describing the watched station, geocoding outcomes, and the
//! nearby-station candidates produced by a search.

use crate::types::geo::LatLon;
use serde::{Deserialize, Serialize};

/// Station identifier used when none has been configured or persisted yet.
pub const DEFAULT_STATION_ID: &str = "KMDIJAMS2";

/// The active station configuration: the provider-specific station code plus
/// an optional human-readable label shown by the presentation layer.
///
/// Owned by the observation fetcher; replaced only by an explicit
/// "switch station" operation and persisted across restarts through the
/// [`SettingsStore`](crate::SettingsStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationIdentity {
    /// The provider-specific station code (e.g. "KMDIJAMS2").
    pub id: String,
    /// Optional display label, typically the neighborhood/city/state of the
    /// station the user picked from a search.
    pub label: Option<String>,
}

impl StationIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
        }
    }

    pub fn with_label(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
        }
    }
}

impl Default for StationIdentity {
    fn default() -> Self {
        Self::new(DEFAULT_STATION_ID)
    }
}

/// The result of resolving a free-text address: coordinates plus the
/// provider's canonical formatted address. Immutable once produced; the
/// formatted address is also the location-cache key.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub location: LatLon,
    pub formatted_address: String,
}

/// One nearby station returned by a proximity search, annotated with its
/// distance from the search point and the sequential selection marker
/// ('A', 'B', ...) used for both the map and the pick list.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateStation {
    pub id: String,
    /// Composite place label (neighborhood, city, state); absent components
    /// are skipped rather than rendered empty.
    pub place: String,
    pub marker: char,
    pub location: LatLon,
    pub distance_km: f64,
    pub distance_mi: f64,
}

impl CandidateStation {
    /// Identity to switch to when the user picks this candidate.
    pub fn identity(&self) -> StationIdentity {
        if self.place.is_empty() {
            StationIdentity::new(&self.id)
        } else {
            StationIdentity::with_label(&self.id, &self.place)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_identity_uses_builtin_station() {
        let identity = StationIdentity::default();
        assert_eq!(identity.id, DEFAULT_STATION_ID);
        assert!(identity.label.is_none());
    }

    #[test]
    fn candidate_identity_carries_place_label() {
        let candidate = CandidateStation {
            id: "KMDFRED5".to_string(),
            place: "Downtown, Frederick, MD".to_string(),
            marker: 'A',
            location: LatLon(39.41, -77.41),
            distance_km: 1.2,
            distance_mi: 0.75,
        };
        let identity = candidate.identity();
        assert_eq!(identity.id, "KMDFRED5");
        assert_eq!(identity.label.as_deref(), Some("Downtown, Frederick, MD"));
    }
}
