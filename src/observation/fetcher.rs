//! Periodic observation refresh with a bounded retry budget and a
//! stale-read policy: a failed refresh never discards the last good record.

use crate::api::{ApiError, WeatherApi};
use crate::observation::error::ObservationError;
use crate::observation::format::{self, FieldFormat};
use crate::observation::record::ObservationRecord;
use crate::types::station::StationIdentity;
use log::{debug, info, warn};
use std::sync::Arc;

/// Total attempts per refresh, including the first one.
pub const REFRESH_ATTEMPTS: u32 = 5;

/// Fetches and holds the current observation for the active station.
pub struct ObservationFetcher {
    api: Arc<dyn WeatherApi>,
    station: StationIdentity,
    record: Option<ObservationRecord>,
    last_attempt_failed: bool,
}

impl ObservationFetcher {
    pub fn new(api: Arc<dyn WeatherApi>, station: StationIdentity) -> Self {
        Self {
            api,
            station,
            record: None,
            last_attempt_failed: false,
        }
    }

    pub fn station(&self) -> &StationIdentity {
        &self.station
    }

    /// Replace the active station. Takes effect on the next [`refresh`]
    /// call; does not itself trigger one. The held record belongs to the
    /// previous station until then, which matches the stale-display policy.
    ///
    /// [`refresh`]: Self::refresh
    pub fn set_station(&mut self, station: StationIdentity) {
        if station != self.station {
            info!("Switching station from {} to {}", self.station.id, station.id);
            self.station = station;
        }
    }

    /// The most recent successfully fetched record, possibly stale.
    pub fn record(&self) -> Option<&ObservationRecord> {
        self.record.as_ref()
    }

    /// Fetch a fresh observation for the active station.
    ///
    /// Transient transport failures are retried up to [`REFRESH_ATTEMPTS`]
    /// total attempts; non-transient failures end the refresh at once. On
    /// success the held record is replaced wholesale. On failure it is left
    /// untouched and [`ObservationError::AccessFailure`] is returned; the
    /// failure onset and the later recovery are each logged once rather than
    /// on every tick.
    pub async fn refresh(&mut self) -> Result<&ObservationRecord, ObservationError> {
        let station_id = self.station.id.clone();
        let mut attempts = 0;
        let last_error: ApiError;

        loop {
            attempts += 1;
            match self.api.current_observation(&station_id).await {
                Ok(response) => {
                    let record = ObservationRecord::from_response(&station_id, response)?;
                    if self.last_attempt_failed {
                        info!("Observation fetch for {} recovered", station_id);
                        self.last_attempt_failed = false;
                    }
                    self.record = Some(record);
                    // unwrap safe: just assigned
                    return Ok(self.record.as_ref().unwrap());
                }
                Err(e) if e.is_transient() && attempts < REFRESH_ATTEMPTS => {
                    debug!(
                        "Attempt {}/{} for station {} failed: {}",
                        attempts, REFRESH_ATTEMPTS, station_id, e
                    );
                }
                Err(e) => {
                    last_error = e;
                    break;
                }
            }
        }

        if self.last_attempt_failed {
            debug!(
                "Observation fetch for {} still failing after {} attempt(s)",
                station_id, attempts
            );
        } else {
            warn!(
                "Observation fetch for {} failed after {} attempt(s): {}",
                station_id, attempts, last_error
            );
            self.last_attempt_failed = true;
        }
        Err(ObservationError::AccessFailure {
            station: station_id,
            attempts,
            source: last_error,
        })
    }

    /// Current temperature in whole degrees Fahrenheit, rounded
    /// half-away-from-zero (71.5 rounds to 72, -0.5 rounds to -1).
    pub fn current_temp_f(&self) -> Result<i32, ObservationError> {
        let record = self.record.as_ref().ok_or(ObservationError::NoObservation)?;
        Ok(record.temp_f()?.round() as i32)
    }

    /// Render the held record through a format table.
    pub fn summary(&self, format: &[FieldFormat]) -> Result<String, ObservationError> {
        let record = self.record.as_ref().ok_or(ObservationError::NoObservation)?;
        format::render(record, format)
    }

    /// Permalink to the station's history page, from the held record.
    pub fn permalink(&self) -> Result<String, ObservationError> {
        let record = self.record.as_ref().ok_or(ObservationError::NoObservation)?;
        record.permalink()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FixtureApi;
    use crate::observation::format::SHORT_FORMAT;
    use crate::types::geo::LatLon;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Backend that fails a configurable number of times with a transient
    /// error before succeeding, counting the calls it receives.
    struct FlakyApi {
        calls: AtomicU32,
        failures_before_success: u32,
        temp_f: &'static str,
    }

    impl FlakyApi {
        fn new(failures_before_success: u32, temp_f: &'static str) -> Self {
            Self {
                calls: AtomicU32::new(0),
                failures_before_success,
                temp_f,
            }
        }

        fn transient_error() -> ApiError {
            ApiError::Transport("http://test.invalid".to_string(), make_reqwest_error())
        }
    }

    fn make_reqwest_error() -> reqwest::Error {
        // reqwest::Error has no public constructor; provoke one from an
        // invalid URL, which surfaces at build() without touching the network.
        match reqwest::Client::new().get("http://[invalid").build() {
            Ok(_) => unreachable!("request build must fail"),
            Err(e) => e,
        }
    }

    #[async_trait]
    impl WeatherApi for FlakyApi {
        async fn current_observation(&self, station_id: &str) -> Result<Value, ApiError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures_before_success {
                Err(Self::transient_error())
            } else {
                Ok(json!({
                    "station_id": station_id,
                    "observation_time": "10:00 AM",
                    "temp_f": self.temp_f,
                    "dewpoint_string": "60 F"
                }))
            }
        }

        async fn nearby_stations(&self, _location: LatLon) -> Result<Value, ApiError> {
            unimplemented!("not used by fetcher tests")
        }
    }

    fn fetcher_with(api: Arc<dyn WeatherApi>) -> ObservationFetcher {
        ObservationFetcher::new(api, StationIdentity::new("KMDIJAMS2"))
    }

    #[tokio::test]
    async fn refresh_succeeds_after_transient_failures() {
        let api = Arc::new(FlakyApi::new(3, "72.0"));
        let mut fetcher = fetcher_with(api.clone());
        fetcher.refresh().await.unwrap();
        assert_eq!(api.calls.load(Ordering::SeqCst), 4);
        assert_eq!(fetcher.current_temp_f().unwrap(), 72);
    }

    #[tokio::test]
    async fn refresh_exhausts_retry_budget_and_keeps_stale_record() {
        // First refresh succeeds so a record is held.
        let good = Arc::new(FlakyApi::new(0, "72.0"));
        let mut fetcher = fetcher_with(good);
        fetcher.refresh().await.unwrap();
        let held = fetcher.record().cloned();

        // Swap in a backend that never succeeds.
        let bad = Arc::new(FlakyApi::new(u32::MAX, "0.0"));
        fetcher.api = bad.clone();
        let err = fetcher.refresh().await.unwrap_err();
        assert!(
            matches!(err, ObservationError::AccessFailure { attempts, .. } if attempts == REFRESH_ATTEMPTS)
        );
        assert_eq!(bad.calls.load(Ordering::SeqCst), REFRESH_ATTEMPTS);
        // Stale record is untouched.
        assert_eq!(fetcher.record(), held.as_ref());
        assert_eq!(fetcher.current_temp_f().unwrap(), 72);
    }

    #[tokio::test]
    async fn failure_onset_and_recovery_flip_the_flag_once() {
        let api = Arc::new(FlakyApi::new(0, "72.0"));
        let mut fetcher = fetcher_with(api);
        assert!(!fetcher.last_attempt_failed);

        fetcher.api = Arc::new(FlakyApi::new(u32::MAX, "0.0"));
        fetcher.refresh().await.unwrap_err();
        assert!(fetcher.last_attempt_failed);
        // A second failing refresh keeps the flag set (logged at debug, not warn).
        fetcher.refresh().await.unwrap_err();
        assert!(fetcher.last_attempt_failed);

        fetcher.api = Arc::new(FlakyApi::new(0, "72.0"));
        fetcher.refresh().await.unwrap();
        assert!(!fetcher.last_attempt_failed);
    }

    #[tokio::test]
    async fn temperature_rounds_half_away_from_zero() {
        for (raw, expected) in [("71.6", 72), ("71.5", 72), ("71.4", 71), ("-0.5", -1)] {
            let api = Arc::new(FlakyApi::new(0, raw));
            let mut fetcher = fetcher_with(api);
            fetcher.refresh().await.unwrap();
            assert_eq!(fetcher.current_temp_f().unwrap(), expected, "temp_f {raw}");
        }
    }

    #[tokio::test]
    async fn reads_before_first_fetch_are_no_observation() {
        let fetcher = fetcher_with(Arc::new(FixtureApi));
        assert!(matches!(
            fetcher.current_temp_f(),
            Err(ObservationError::NoObservation)
        ));
        assert!(matches!(
            fetcher.summary(SHORT_FORMAT),
            Err(ObservationError::NoObservation)
        ));
    }

    #[tokio::test]
    async fn set_station_takes_effect_on_next_refresh() {
        let mut fetcher = fetcher_with(Arc::new(FixtureApi));
        fetcher.set_station(StationIdentity::new("KMDFRED5"));
        fetcher.refresh().await.unwrap();
        let summary = fetcher.summary(SHORT_FORMAT).unwrap();
        assert!(summary.contains("Station ID: KMDFRED5"));
    }
}
