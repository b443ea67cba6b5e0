use chrono::{Local, NaiveDateTime, TimeZone};

use super::error::ConvertError;
use crate::DateZone;
use crate::utils::config::SRC_DATE_FORMAT;

/// `YYYY:MM:DD HH:MM:SS` to epoch milliseconds (whole seconds × 1000).
pub fn capture_date_to_epoch_ms(raw: &str, zone: DateZone) -> Result<i64, ConvertError> {
    let date_err = |reason: String| ConvertError::Date {
        input: raw.to_string(),
        reason,
    };
    let naive = NaiveDateTime::parse_from_str(raw.trim(), SRC_DATE_FORMAT)
        .map_err(|e| date_err(e.to_string()))?;
    let secs = match zone {
        DateZone::Utc => naive.and_utc().timestamp(),
        DateZone::Local => Local
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| date_err("local time does not exist".to_string()))?
            .timestamp(),
    };
    Ok(secs * 1000)
}

/// Same as [`capture_date_to_epoch_ms`], rendered as the decimal string stored in the record.
pub fn format_capture_date(raw: &str, zone: DateZone) -> Result<String, ConvertError> {
    capture_date_to_epoch_ms(raw, zone).map(|ms| ms.to_string())
}
