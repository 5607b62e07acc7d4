//! The main entry point tying the watcher together: periodic observation
//! refresh for the active station, and the address-search flow that
//! geocodes, finds nearby stations, ranks them, and builds the map preview.

use crate::api::WeatherApi;
use crate::error::WuwatchError;
use crate::locate::error::LocateError;
use crate::locate::geocode::Geocoder;
use crate::locate::map::StaticMapProvider;
use crate::locate::nearby::StationLocator;
use crate::observation::error::ObservationError;
use crate::observation::fetcher::ObservationFetcher;
use crate::observation::format::FieldFormat;
use crate::settings::{Settings, SettingsStore};
use crate::types::station::{CandidateStation, GeocodeResult, StationIdentity};
use bon::bon;
use std::sync::Arc;

/// Everything one successful search produces. The candidate order matches
/// the marker labels one-to-one, on the map and in the pick list.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub geocoded: GeocodeResult,
    pub candidates: Vec<CandidateStation>,
    pub map_url: String,
}

/// The watcher client.
///
/// Construct one with the builder, injecting the weather backend, the
/// geocoder, and a settings store; the persisted station, search history,
/// and location cache are loaded during construction.
///
/// # Examples
///
/// ```rust
/// # use std::sync::Arc;
/// # use wuwatch::{Wuwatch, WuwatchError, FixtureApi, FixtureGeocoder, MemorySettingsStore};
/// # async fn run() -> Result<(), WuwatchError> {
/// let mut watcher = Wuwatch::builder()
///     .api(Arc::new(FixtureApi))
///     .geocoder(Arc::new(FixtureGeocoder))
///     .store(Box::new(MemorySettingsStore::default()))
///     .build()?;
///
/// watcher.refresh().await?;
/// println!("{}", watcher.icon_text()?);
/// # Ok(())
/// # }
/// ```
pub struct Wuwatch {
    fetcher: ObservationFetcher,
    locator: StationLocator,
    map: StaticMapProvider,
    store: Box<dyn SettingsStore>,
    api_key: Option<String>,
    search_history: Vec<String>,
}

#[bon]
impl Wuwatch {
    /// Build a watcher from injected backends plus the persisted settings.
    ///
    /// * `.api(Arc<dyn WeatherApi>)`: **Required.** Weather-service backend.
    /// * `.geocoder(Arc<dyn Geocoder>)`: **Required.** Address resolver.
    /// * `.store(Box<dyn SettingsStore>)`: **Required.** Settings seam; its
    ///   `load` supplies the active station and the location cache.
    /// * `.map(StaticMapProvider)`: Optional. Defaults to the standard
    ///   static-map provider using the persisted API credential.
    #[builder]
    pub fn new(
        api: Arc<dyn WeatherApi>,
        geocoder: Arc<dyn Geocoder>,
        store: Box<dyn SettingsStore>,
        map: Option<StaticMapProvider>,
    ) -> Result<Self, WuwatchError> {
        let settings = store.load()?;
        let map = map.unwrap_or_else(|| StaticMapProvider::new(settings.api_key.clone()));
        Ok(Self {
            fetcher: ObservationFetcher::new(api.clone(), settings.station),
            locator: StationLocator::with_cache(api, geocoder, settings.location_cache),
            map,
            store,
            api_key: settings.api_key,
            search_history: settings.search_history,
        })
    }

    /// The active station.
    pub fn station(&self) -> &StationIdentity {
        self.fetcher.station()
    }

    /// Addresses searched so far, most recent last.
    pub fn search_history(&self) -> &[String] {
        &self.search_history
    }

    /// Fetch a fresh observation for the active station. See
    /// [`ObservationFetcher::refresh`] for the retry and stale-read policy.
    pub async fn refresh(&mut self) -> Result<(), ObservationError> {
        self.fetcher.refresh().await?;
        Ok(())
    }

    /// Short text for the taskbar icon: the whole-degree temperature.
    pub fn icon_text(&self) -> Result<String, ObservationError> {
        Ok(self.fetcher.current_temp_f()?.to_string())
    }

    /// Render the current record through a format table
    /// ([`SHORT_FORMAT`](crate::SHORT_FORMAT) or
    /// [`LONG_FORMAT`](crate::LONG_FORMAT)).
    pub fn summary(&self, format: &[FieldFormat]) -> Result<String, ObservationError> {
        self.fetcher.summary(format)
    }

    /// Permalink to the active station's observation history page.
    pub fn permalink(&self) -> Result<String, ObservationError> {
        self.fetcher.permalink()
    }

    /// Switch the active station; takes effect on the next refresh. The new
    /// identity is persisted immediately.
    pub fn set_station(&mut self, station: StationIdentity) -> Result<(), WuwatchError> {
        self.fetcher.set_station(station);
        self.save()?;
        Ok(())
    }

    /// Switch to a candidate picked from a search result.
    pub fn select_candidate(&mut self, candidate: &CandidateStation) -> Result<(), WuwatchError> {
        self.set_station(candidate.identity())
    }

    /// Run one full search: geocode the address, find and rank nearby
    /// stations (reusing the location cache when fresh), record the address
    /// in the search history, and build the map preview URL.
    ///
    /// Any failure ends this search attempt and leaves previously computed
    /// results, the history, and the cache untouched.
    pub async fn search(&mut self, address: &str) -> Result<SearchOutcome, WuwatchError> {
        let geocoded = self.locator.geocode(address).await?;
        let candidates = self.locator.find_nearby(&geocoded).await?;

        let canonical = geocoded.formatted_address.clone();
        self.search_history.retain(|a| a != &canonical);
        self.search_history.push(canonical);
        self.save()?;

        let map_url = self.map.map_url(geocoded.location, &candidates);
        Ok(SearchOutcome {
            geocoded,
            candidates,
            map_url,
        })
    }

    /// Fetch the rendered map preview. A failure here does not invalidate
    /// the search outcome it belongs to.
    pub async fn map_image(&self, url: &str) -> Result<Vec<u8>, LocateError> {
        self.map.fetch_image(url).await
    }

    /// Drop an address from the search history and evict its cached lookup.
    pub fn forget_address(&mut self, address: &str) -> Result<bool, WuwatchError> {
        let before = self.search_history.len();
        self.search_history.retain(|a| a != address);
        let evicted = self.locator.invalidate(address);
        let changed = evicted || self.search_history.len() != before;
        if changed {
            self.save()?;
        }
        Ok(changed)
    }

    /// Persist the current station, history, and cache through the store.
    pub fn save(&self) -> Result<(), WuwatchError> {
        let settings = Settings {
            station: self.fetcher.station().clone(),
            api_key: self.api_key.clone(),
            search_history: self.search_history.clone(),
            location_cache: self.locator.cache().clone(),
        };
        self.store.save(&settings)?;
        Ok(())
    }
}
