//! The periodic refresh loop: one tick per minute, never overlapping, and a
//! stale display kept on the screen when a refresh fails.

use crate::error::WuwatchError;
use crate::observation::error::ObservationError;
use crate::observation::format::LONG_FORMAT;
use crate::presenter::Presenter;
use crate::wuwatch::Wuwatch;
use log::{info, warn};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Interval between observation refreshes.
pub const REFRESH_PERIOD: Duration = Duration::from_secs(60);

/// Run one refresh and push the result to the presenter.
///
/// An `AccessFailure` while a previous record is held is swallowed: the
/// stale summary stays on display and the failure was already logged by the
/// fetcher. An `AccessFailure` with no record ever fetched propagates, since
/// there is nothing to show.
pub async fn refresh_once(
    watcher: &mut Wuwatch,
    presenter: &dyn Presenter,
) -> Result<(), WuwatchError> {
    match watcher.refresh().await {
        Ok(()) => {}
        Err(err @ ObservationError::AccessFailure { .. }) => {
            if watcher.icon_text().is_err() {
                return Err(err.into());
            }
            presenter.show_message("Weather update unavailable; showing last known conditions");
        }
        Err(err) => return Err(err.into()),
    }

    let icon_text = watcher.icon_text()?;
    let summary = watcher.summary(LONG_FORMAT)?;
    presenter.show_observation(&icon_text, &summary);
    Ok(())
}

/// Run the refresh loop until cancelled (ctrl-c in the CLI shell). Ticks are
/// delayed rather than stacked, so a slow refresh never overlaps the next.
pub async fn run_refresh_loop(
    watcher: &mut Wuwatch,
    presenter: &dyn Presenter,
    period: Duration,
) -> Result<(), WuwatchError> {
    info!(
        "Watching station {} every {:?}",
        watcher.station().id,
        period
    );
    let mut ticks = tokio::time::interval(period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticks.tick().await;
        if let Err(e) = refresh_once(watcher, presenter).await {
            // Only reachable before the first successful fetch.
            warn!("Refresh failed with nothing to display: {}", e);
        }
    }
}
