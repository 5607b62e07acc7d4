//! Static-map preview for a candidate set: URL construction plus an
//! optional image fetch. The map provider is a pure rendering collaborator;
//! a fetch failure never invalidates the already-ranked candidates.

use crate::api::{ApiError, ATTEMPT_TIMEOUT};
use crate::locate::error::LocateError;
use crate::types::geo::LatLon;
use crate::types::station::CandidateStation;
use log::info;
use reqwest::Client;

pub const DEFAULT_MAP_URL: &str = "https://maps.googleapis.com/maps/api/staticmap";

/// Rendered map dimensions in pixels.
pub const MAP_SIZE: (u32, u32) = (640, 480);

/// Builds marker-annotated static map URLs and fetches the rendered image.
pub struct StaticMapProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl StaticMapProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_MAP_URL, api_key)
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

    /// Build the preview URL: one labeled marker per candidate, in candidate
    /// order so map labels line up with the selection list, centered on the
    /// search point.
    pub fn map_url(&self, center: LatLon, candidates: &[CandidateStation]) -> String {
        let mut url = format!(
            "{}?size={}x{}&center={},{}",
            self.base_url, MAP_SIZE.0, MAP_SIZE.1, center.0, center.1
        );
        for candidate in candidates {
            url.push_str(&format!(
                "&markers=label:{}%7C{},{}",
                candidate.marker, candidate.location.0, candidate.location.1
            ));
        }
        if let Some(key) = self.api_key.as_deref() {
            url.push_str("&key=");
            url.push_str(key);
        }
        url
    }

    /// Fetch the rendered image bytes. Failure is terminal for the preview
    /// only and maps to [`LocateError::MapRender`].
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, LocateError> {
        info!("Fetching map image from {}", url);
        let to_render_err = |source: ApiError| LocateError::MapRender {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| to_render_err(ApiError::Transport(url.to_string(), e)))?;
        let response = response.error_for_status().map_err(|e| {
            to_render_err(if let Some(status) = e.status() {
                ApiError::HttpStatus {
                    url: url.to_string(),
                    status,
                    source: e,
                }
            } else {
                ApiError::Transport(url.to_string(), e)
            })
        })?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| to_render_err(ApiError::Parse(url.to_string(), e)))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, marker: char, lat: f64, lon: f64) -> CandidateStation {
        CandidateStation {
            id: id.to_string(),
            place: String::new(),
            marker,
            location: LatLon(lat, lon),
            distance_km: 0.0,
            distance_mi: 0.0,
        }
    }

    #[test]
    fn url_lists_markers_in_candidate_order() {
        let provider = StaticMapProvider::with_base_url("https://maps.test/staticmap", None);
        let url = provider.map_url(
            LatLon(39.4143, -77.4105),
            &[
                candidate("a", 'A', 39.4143, -77.4105),
                candidate("b", 'B', 39.3354, -77.3194),
            ],
        );
        assert!(url.starts_with("https://maps.test/staticmap?size=640x480&center=39.4143,-77.4105"));
        let a = url.find("label:A").unwrap();
        let b = url.find("label:B").unwrap();
        assert!(a < b);
    }

    #[test]
    fn key_is_appended_when_configured() {
        let provider =
            StaticMapProvider::with_base_url("https://maps.test/staticmap", Some("k123".into()));
        let url = provider.map_url(LatLon(0.0, 0.0), &[]);
        assert!(url.ends_with("&key=k123"));
    }
}
