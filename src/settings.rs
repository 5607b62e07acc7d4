//! Persisted configuration behind the [`SettingsStore`] capability: the
//! active station, the search history, and the location cache round-trip
//! through it so they survive restarts. The GUI shell injects its own store;
//! the CLI uses the JSON file store.

use crate::locate::cache::LocationCache;
use crate::types::station::StationIdentity;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

const SETTINGS_DIR_NAME: &str = "wuwatch";
const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to determine settings directory")]
    DirResolution,

    #[error("failed to create settings directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("failed to read settings file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("failed to write settings file '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("failed to parse settings file '{0}'")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("failed to serialize settings")]
    Serialize(#[source] serde_json::Error),
}

/// Everything the watcher persists across restarts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub station: StationIdentity,
    /// Optional API credential shared by the nearby-stations, geocoding,
    /// and static-map providers.
    pub api_key: Option<String>,
    /// Addresses the user has searched, most recent last.
    pub search_history: Vec<String>,
    pub location_cache: LocationCache,
}

/// Load/save seam for [`Settings`], injected into the core rather than
/// inherited from any toolkit base class.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<Settings, SettingsError>;
    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}

/// File-backed store writing pretty-printed JSON.
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform config directory, e.g.
    /// `~/.config/wuwatch/settings.json` on Linux.
    pub fn at_default_path() -> Result<Self, SettingsError> {
        let dir = dirs::config_dir().ok_or(SettingsError::DirResolution)?;
        Ok(Self::new(dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    /// First run (no file yet) yields the defaults rather than an error.
    fn load(&self) -> Result<Settings, SettingsError> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let contents =
            fs::read_to_string(&self.path).map_err(|e| SettingsError::Read(self.path.clone(), e))?;
        serde_json::from_str(&contents).map_err(|e| SettingsError::Parse(self.path.clone(), e))
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SettingsError::DirCreation(parent.to_path_buf(), e))?;
        }
        let contents =
            serde_json::to_string_pretty(settings).map_err(SettingsError::Serialize)?;
        fs::write(&self.path, contents).map_err(|e| SettingsError::Write(self.path.clone(), e))
    }
}

/// In-memory store for tests and embedding shells that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<Settings>,
}

impl MemorySettingsStore {
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings, SettingsError> {
        Ok(self
            .settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        *self
            .settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = settings.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSettingsStore::new(dir.path().join("settings.json"));
        let settings = store.load().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn settings_round_trip_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSettingsStore::new(dir.path().join("nested").join("settings.json"));

        let mut settings = Settings {
            station: StationIdentity::with_label("KMDFRED5", "Downtown, Frederick, MD"),
            api_key: Some("k123".to_string()),
            search_history: vec!["100 Main St, Frederick, MD 21701, USA".to_string()],
            location_cache: LocationCache::default(),
        };
        settings.location_cache.insert(
            "100 Main St, Frederick, MD 21701, USA",
            json!({"stations": []}),
            Utc::now(),
        );

        store.save(&settings).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();
        let store = JsonSettingsStore::new(&path);
        assert!(matches!(store.load(), Err(SettingsError::Parse(_, _))));
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemorySettingsStore::default();
        let mut settings = store.load().unwrap();
        settings.station = StationIdentity::new("KMDNEWMA2");
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap().station.id, "KMDNEWMA2");
    }
}
