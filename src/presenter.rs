//! Presentation seam. The GUI shell (systray icon, details window, map
//! preview) implements [`Presenter`]; the core only hands it formatted text
//! and URLs. [`LogPresenter`] backs the headless CLI.

use crate::types::station::CandidateStation;
use log::{info, warn};

/// Receives display-ready output from the core. All methods are
/// fire-and-forget; presentation failures are not the core's concern.
pub trait Presenter: Send + Sync {
    /// A refresh completed: `icon_text` is the short temperature string for
    /// the taskbar icon, `summary` the multi-line details text.
    fn show_observation(&self, icon_text: &str, summary: &str);

    /// A search completed: ranked candidates plus the marker-annotated map
    /// preview URL.
    fn show_candidates(&self, candidates: &[CandidateStation], map_url: &str);

    /// A search or refresh ended with a user-visible message.
    fn show_message(&self, message: &str);
}

/// Presenter that writes everything to the log, used by the CLI.
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn show_observation(&self, icon_text: &str, summary: &str) {
        info!("Current temperature: {}\u{00B0}F", icon_text);
        for line in summary.lines() {
            info!("  {}", line);
        }
    }

    fn show_candidates(&self, candidates: &[CandidateStation], map_url: &str) {
        for candidate in candidates {
            info!(
                "  [{}] {} {} ({:.1} km / {:.1} mi)",
                candidate.marker,
                candidate.id,
                candidate.place,
                candidate.distance_km,
                candidate.distance_mi
            );
        }
        info!("Map preview: {}", map_url);
    }

    fn show_message(&self, message: &str) {
        warn!("{}", message);
    }
}
