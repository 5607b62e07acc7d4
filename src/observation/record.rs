//! The parsed current-conditions snapshot and its field-path accessor.

use crate::observation::error::ObservationError;
use serde_json::Value;

/// Field path of the temperature used for the icon text.
pub const TEMP_F_FIELD: &str = "temp_f";

/// Field path of the observation permalink shown in the details window.
pub const PERMALINK_FIELD: &str = "observation_permalink";

/// An immutable, possibly-nested mapping from field path to scalar value,
/// produced by parsing one current-observation response.
///
/// A new fetch builds a wholly new record; nothing mutates an existing one.
/// Paths are slash-delimited and descend one object level per segment, so
/// `location/full` resolves `doc["location"]["full"]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRecord {
    doc: Value,
}

impl ObservationRecord {
    /// Build a record from a provider response. Accepts either the bare
    /// observation object or the common envelope nesting it under
    /// `current_observation`.
    pub fn from_response(station_id: &str, response: Value) -> Result<Self, ObservationError> {
        let doc = match response {
            Value::Object(mut map) => match map.remove("current_observation") {
                Some(inner @ Value::Object(_)) => inner,
                Some(_) => {
                    return Err(ObservationError::MalformedPayload(station_id.to_string()))
                }
                None => Value::Object(map),
            },
            _ => return Err(ObservationError::MalformedPayload(station_id.to_string())),
        };
        Ok(Self { doc })
    }

    /// Resolve a slash-delimited field path to its scalar value, rendered as
    /// text. Returns `None` when any segment is absent or the leaf is not a
    /// scalar.
    pub fn lookup(&self, path: &str) -> Option<String> {
        let mut node = &self.doc;
        for segment in path.split('/') {
            node = node.as_object()?.get(segment)?;
        }
        match node {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Like [`lookup`](Self::lookup) but a missing path is a loud
    /// [`ObservationError::MissingField`].
    pub fn field(&self, path: &str) -> Result<String, ObservationError> {
        self.lookup(path)
            .ok_or_else(|| ObservationError::MissingField(path.to_string()))
    }

    /// The raw Fahrenheit temperature as a float.
    pub fn temp_f(&self) -> Result<f64, ObservationError> {
        let text = self.field(TEMP_F_FIELD)?;
        text.trim()
            .parse::<f64>()
            .map_err(|_| ObservationError::FieldNotNumeric {
                field: TEMP_F_FIELD.to_string(),
                value: text,
            })
    }

    /// Permalink to the station's observation history page.
    pub fn permalink(&self) -> Result<String, ObservationError> {
        self.field(PERMALINK_FIELD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> ObservationRecord {
        ObservationRecord::from_response("KMDIJAMS2", value).unwrap()
    }

    #[test]
    fn lookup_descends_nested_paths() {
        let rec = record(json!({
            "location": { "full": "Frederick, Maryland" },
            "temp_f": "72.0"
        }));
        assert_eq!(rec.lookup("location/full").as_deref(), Some("Frederick, Maryland"));
        assert_eq!(rec.lookup("temp_f").as_deref(), Some("72.0"));
        assert_eq!(rec.lookup("location/missing"), None);
        assert_eq!(rec.lookup("missing/full"), None);
    }

    #[test]
    fn envelope_is_unwrapped() {
        let rec = record(json!({
            "current_observation": { "station_id": "KMDIJAMS2" }
        }));
        assert_eq!(rec.lookup("station_id").as_deref(), Some("KMDIJAMS2"));
    }

    #[test]
    fn numeric_leaves_render_as_text() {
        let rec = record(json!({ "temp_f": 71.6 }));
        assert_eq!(rec.lookup("temp_f").as_deref(), Some("71.6"));
        assert!((rec.temp_f().unwrap() - 71.6).abs() < 1e-9);
    }

    #[test]
    fn missing_field_is_loud() {
        let rec = record(json!({ "temp_f": "72.0" }));
        let err = rec.field("dewpoint_string").unwrap_err();
        assert!(matches!(err, ObservationError::MissingField(ref f) if f == "dewpoint_string"));
    }

    #[test]
    fn non_numeric_temperature_is_reported() {
        let rec = record(json!({ "temp_f": "NA" }));
        let err = rec.temp_f().unwrap_err();
        assert!(matches!(err, ObservationError::FieldNotNumeric { .. }));
    }

    #[test]
    fn non_object_payload_is_malformed() {
        let err = ObservationRecord::from_response("KMDIJAMS2", json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ObservationError::MalformedPayload(_)));
    }
}
