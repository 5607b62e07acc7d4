mod api;
mod app;
mod error;
mod locate;
mod observation;
mod presenter;
mod settings;
mod types;
mod wuwatch;

pub use error::WuwatchError;
pub use wuwatch::*;

pub use api::{ApiError, FixtureApi, WeatherApi, WundergroundApi, ATTEMPT_TIMEOUT};
pub use app::{refresh_once, run_refresh_loop, REFRESH_PERIOD};
pub use presenter::{LogPresenter, Presenter};
pub use settings::{JsonSettingsStore, MemorySettingsStore, Settings, SettingsError, SettingsStore};

pub use types::geo::LatLon;
pub use types::station::{CandidateStation, GeocodeResult, StationIdentity, DEFAULT_STATION_ID};

pub use observation::error::ObservationError;
pub use observation::fetcher::{ObservationFetcher, REFRESH_ATTEMPTS};
pub use observation::format::{FieldFormat, LONG_FORMAT, SHORT_FORMAT};
pub use observation::record::ObservationRecord;

pub use locate::cache::{CacheEntry, LocationCache, FRESHNESS_WINDOW_DAYS};
pub use locate::error::LocateError;
pub use locate::geocode::{FixtureGeocoder, Geocoder, GoogleGeocoder};
pub use locate::map::StaticMapProvider;
pub use locate::nearby::{StationLocator, MAX_DISTANCE_KM, MAX_STATIONS, MIN_STATIONS};
