//! Database value parsing utilities
//!
//! Provides error-safe parsing of stored values.

use chrono::{NaiveDate, NaiveTime};
use rusqlite::types::Type;
use rusqlite::Error as SqlError;
use uuid::Uuid;

use crate::models::AttendanceStatus;

/// Date column format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

fn conversion_error<E>(column: usize, e: E) -> SqlError
where
    E: std::error::Error + Send + Sync + 'static,
{
    SqlError::FromSqlConversionFailure(column, Type::Text, Box::new(e))
}

/// Parse a UUID from a database string column
pub fn parse_uuid(column: usize, s: &str) -> Result<Uuid, SqlError> {
    Uuid::parse_str(s).map_err(|e| conversion_error(column, e))
}

/// Parse a calendar date stored as `YYYY-MM-DD`
pub fn parse_date(column: usize, s: &str) -> Result<NaiveDate, SqlError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| conversion_error(column, e))
}

/// Time of day column format
pub const TIME_FORMAT: &str = "%H:%M";

/// Parse a time of day stored as `HH:MM`
pub fn parse_time(column: usize, s: &str) -> Result<NaiveTime, SqlError> {
    NaiveTime::parse_from_str(s, TIME_FORMAT).map_err(|e| conversion_error(column, e))
}

/// Parse an attendance status code
pub fn parse_status(column: usize, s: &str) -> Result<AttendanceStatus, SqlError> {
    AttendanceStatus::parse(s).ok_or_else(|| {
        SqlError::FromSqlConversionFailure(
            column,
            Type::Text,
            format!("unknown attendance status {s:?}").into(),
        )
    })
}

/// Extension trait for converting rusqlite Results to Option
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, SqlError>;
}

impl<T> OptionalExt<T> for Result<T, SqlError> {
    fn optional(self) -> Result<Option<T>, SqlError> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(SqlError::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
