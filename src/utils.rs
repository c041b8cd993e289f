//! Shared utility functions for the weather dashboard

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse the calendar day out of a date string as the backend may send it
///
/// The weather-data endpoint has shipped dates as plain `YYYY-MM-DD`, as RFC 3339
/// timestamps and as RFC 2822 strings (`Tue, 02 Jan 2024 00:00:00 GMT`). Timestamps
/// carrying an offset are converted to UTC before the time of day is dropped.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use weather_insight::utils::parse_calendar_date;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
/// assert_eq!(parse_calendar_date("2024-01-02"), Some(day));
/// assert_eq!(parse_calendar_date("2024-01-02T18:30:00Z"), Some(day));
/// assert_eq!(parse_calendar_date("Tue, 02 Jan 2024 00:00:00 GMT"), Some(day));
/// assert_eq!(parse_calendar_date("not a date"), None);
/// ```
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.date());
        }
    }

    DateTime::parse_from_rfc2822(trimmed)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

/// Round to one decimal place, half away from zero, the way values are displayed
///
/// ```
/// use weather_insight::utils::round1;
///
/// assert_eq!(round1(15.25), 15.3);
/// assert_eq!(round1(-2.25), -2.3);
/// assert_eq!(round1(-0.04), 0.0);
/// ```
pub fn round1(value: f64) -> f64 {
    normalize_zero((value * 10.0).round() / 10.0)
}

/// Normalize -0.0 to 0.0 for cleaner output
pub fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Accept numbers, numeric strings and null for an optional measurement
///
/// Anything that does not read as a finite number becomes `None` so a single
/// malformed field never fails the whole response.
pub fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(lenient_f64))
}

/// Accept a date as a string, a number or null; the raw text is kept as-is
pub fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    })
}

/// Accept a list whose entries may be malformed, keeping the ones that decode
///
/// A missing or non-array value reads as an empty list.
pub fn deserialize_lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(entries)) => entries,
        Some(Value::Null) | None => return Ok(Vec::new()),
        Some(other) => {
            debug!("Expected a list, got {}; treating as empty", other);
            return Ok(Vec::new());
        }
    };

    let total = entries.len();
    let kept: Vec<T> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                debug!("Skipping malformed entry {}: {}", idx, e);
                None
            }
        })
        .collect();

    if kept.len() < total {
        debug!("Kept {} of {} entries", kept.len(), total);
    }
    Ok(kept)
}

fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(parse_calendar_date("2024-03-15"), Some(day(2024, 3, 15)));
        assert_eq!(parse_calendar_date("  2024-03-15 "), Some(day(2024, 3, 15)));
    }

    #[test]
    fn test_parse_naive_timestamps() {
        assert_eq!(
            parse_calendar_date("2024-03-15T06:00:00"),
            Some(day(2024, 3, 15))
        );
        assert_eq!(
            parse_calendar_date("2024-03-15 23:59:59.250"),
            Some(day(2024, 3, 15))
        );
    }

    #[test]
    fn test_parse_offset_timestamp_converts_to_utc_day() {
        // 23:30 at UTC-5 is already the next day in UTC
        assert_eq!(
            parse_calendar_date("2024-03-15T23:30:00-05:00"),
            Some(day(2024, 3, 16))
        );
        assert_eq!(
            parse_calendar_date("2024-03-15T00:00:00+00:00"),
            Some(day(2024, 3, 15))
        );
    }

    #[test]
    fn test_parse_rfc2822() {
        assert_eq!(
            parse_calendar_date("Fri, 15 Mar 2024 00:00:00 GMT"),
            Some(day(2024, 3, 15))
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("15/03/2024"), None);
        assert_eq!(parse_calendar_date("2024-13-01"), None);
    }

    #[test]
    fn test_round1_half_away_from_zero() {
        assert_eq!(round1(15.0), 15.0);
        assert_eq!(round1(0.05), 0.1);
        assert_eq!(round1(-0.05), -0.1);
        assert_eq!(round1(12.34), 12.3);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[10.0, 20.0]), Some(15.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_lenient_f64() {
        assert_eq!(lenient_f64(&serde_json::json!(12.5)), Some(12.5));
        assert_eq!(lenient_f64(&serde_json::json!("7.25")), Some(7.25));
        assert_eq!(lenient_f64(&serde_json::json!("abc")), None);
        assert_eq!(lenient_f64(&serde_json::json!(true)), None);
        assert_eq!(lenient_f64(&Value::Null), None);
    }
}
