use crate::api::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocateError {
    /// The geocoding provider reported no valid match. Terminal for this
    /// search attempt; surfaced directly as a user-visible message.
    #[error("no match found for address '{0}'")]
    AddressNotFound(String),

    /// The geocoding provider answered with a non-success status of its own
    /// (quota, denied key, malformed request).
    #[error("geocoding '{address}' failed with provider status '{status}'")]
    GeocodeProvider { address: String, status: String },

    /// The geocoding response was not in the shape we expect.
    #[error("geocoding response for '{0}' was malformed")]
    GeocodeMalformed(String),

    /// Transport or HTTP failure talking to the weather or geocoding
    /// service. Ends the search attempt; no retry.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The nearby-stations payload did not parse into candidate stations.
    #[error("nearby-stations payload malformed: {0}")]
    MalformedPayload(String),

    /// The static map image could not be fetched. Terminal for the map
    /// preview only; the already-ranked candidate list stays valid.
    #[error("failed to fetch map image from '{url}'")]
    MapRender {
        url: String,
        #[source]
        source: ApiError,
    },
}
