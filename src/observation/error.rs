use crate::api::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObservationError {
    /// The retry budget for one refresh was exhausted (or a non-transient
    /// failure ended it early). The previously held record, if any, stays in
    /// place; callers treat this as "no update available right now".
    #[error("giving up on station '{station}' after {attempts} attempt(s)")]
    AccessFailure {
        station: String,
        attempts: u32,
        #[source]
        source: ApiError,
    },

    /// No successful fetch has ever happened, so there is nothing to read.
    #[error("no observation has been fetched yet")]
    NoObservation,

    /// The provider returned something that is not a nested document object.
    #[error("observation payload for station '{0}' is not a document object")]
    MalformedPayload(String),

    /// A display format referenced a field the parsed record does not carry.
    /// The format tables and the provider schema must stay consistent, so
    /// this is a configuration mismatch, not a recoverable per-field miss.
    #[error("display format references field '{0}' missing from the observation")]
    MissingField(String),

    /// A field expected to hold a number (e.g. `temp_f`) did not parse as one.
    #[error("field '{field}' is not numeric: '{value}'")]
    FieldNotNumeric { field: String, value: String },
}
