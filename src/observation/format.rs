//! Display format tables: ordered (field path, template) pairs rendered into
//! the multi-line summaries the presentation layer shows.

use crate::observation::error::ObservationError;
use crate::observation::record::ObservationRecord;

/// One line of a summary: a slash-delimited field path and a template with a
/// single `{}` placeholder for the resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldFormat {
    pub path: &'static str,
    pub template: &'static str,
}

const fn line(path: &'static str, template: &'static str) -> FieldFormat {
    FieldFormat { path, template }
}

/// Compact summary used for the systray tooltip.
pub const SHORT_FORMAT: &[FieldFormat] = &[
    line("station_id", "Station ID: {}"),
    line("observation_time", "{}"),
    line("temp_f", "Temperature: {}"),
    line("dewpoint_string", "Dew Point: {}"),
];

/// Full summary for the details window. Line order matches the data-source
/// credit-first layout of the original display.
pub const LONG_FORMAT: &[FieldFormat] = &[
    line("credit", "{}"),
    line("location/full", "{}"),
    line("station_id", "Station ID: {}"),
    line("observation_time", "{}"),
    line("temperature_string", "Temperature: {}"),
    line("wind_string", "Wind Speed: {}"),
    line("dewpoint_string", "Dew Point: {}"),
    line("windchill_string", "Wind Chill: {}"),
    line("pressure_string", "Barometric Pressure: {}"),
    line("precip_1hr_string", "Precipitation (current hour): {}"),
    line("precip_today_string", "Precipitation (today): {}"),
];

/// Render a format table against a record, joining lines with `\n` and no
/// trailing separator. A path missing from the record fails loudly; the
/// format tables and the provider schema must be kept consistent.
pub fn render(record: &ObservationRecord, format: &[FieldFormat]) -> Result<String, ObservationError> {
    let mut lines = Vec::with_capacity(format.len());
    for entry in format {
        let value = record.field(entry.path)?;
        lines.push(entry.template.replacen("{}", &value, 1));
    }
    Ok(lines.join("\n"))
}
