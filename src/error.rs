use crate::locate::error::LocateError;
use crate::observation::error::ObservationError;
use crate::settings::SettingsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WuwatchError {
    #[error(transparent)]
    Observation(#[from] ObservationError),

    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}
