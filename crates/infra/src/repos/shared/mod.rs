use calendar_notifier_domain::Moment;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum RowDecodeError {
    #[error("The row has no value for the column: {0}")]
    MissingField(&'static str),
    #[error("The column: {field} has the invalid value: `{value}`")]
    InvalidValue { field: &'static str, value: String },
}

/// A cell value as entered, without surrounding whitespace and without the
/// leading `'` spreadsheets use to force text
pub fn cell_text(cell: &str) -> &str {
    let cell = cell.trim();
    cell.strip_prefix('\'').unwrap_or(cell)
}

pub fn optional_cell(cell: &str) -> Option<String> {
    match cell_text(cell) {
        "" => None,
        text => Some(text.to_string()),
    }
}

pub fn required_cell(cell: &str, field: &'static str) -> Result<String, RowDecodeError> {
    optional_cell(cell).ok_or(RowDecodeError::MissingField(field))
}

pub fn encode_instant(instant: &Moment, timezone: &Tz) -> String {
    instant.with_timezone(timezone).to_rfc3339()
}

pub fn decode_instant(cell: &str, field: &'static str) -> Result<Moment, RowDecodeError> {
    let text = required_cell(cell, field)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|_| RowDecodeError::InvalidValue { field, value: text })
}
