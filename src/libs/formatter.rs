//! Timestamp parsing and display formatting for tracker records.
//!
//! Records are stored as RFC3339 UTC strings with millisecond precision
//! (`2024-01-01T22:00:00.000Z`). That representation is lexicographically
//! monotonic, so range queries compare the strings directly in SQL. Display
//! output, on the other hand, always uses the local calendar so that a sleep
//! that started at 23:00 local time shows up on the right day.
//!
//! ## Usage
//!
//! ```rust
//! use bodylog::libs::formatter::sleep_duration;
//!
//! let d = sleep_duration("2024-01-01T22:00:00.000Z", "2024-01-02T06:30:00.000Z")?;
//! assert_eq!((d.hours, d.minutes, d.total_minutes), (8, 30, 510));
//! # anyhow::Ok(())
//! ```

use crate::libs::messages::Message;
use crate::msg_bail_anyhow;
use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};

/// Breakdown of the wall-clock time between two timestamps.
///
/// `hours` is the full-hour count (floored toward negative infinity),
/// `minutes` the rounded remainder within the hour, and `total_minutes`
/// the rounded overall length. Inverted ranges are not rejected; they
/// simply yield negative values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepDuration {
    pub hours: i64,
    pub minutes: i64,
    pub total_minutes: i64,
}

/// Accepted fallback layouts for timestamps arriving without a UTC offset.
///
/// Browser `datetime-local` inputs and hand-entered values carry no zone
/// information; they are interpreted as local time. Bare dates from a date
/// picker are handled separately as local midnight.
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Returns the current instant in the canonical storage representation.
pub fn now_utc_string() -> String {
    to_storage_string(Utc::now())
}

/// Renders an instant in the canonical storage representation.
pub fn to_storage_string(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a timestamp string into a UTC instant.
///
/// RFC3339 values are taken as-is; naive values are interpreted as local
/// time and bare dates as local midnight. Anything else is an error,
/// surfaced to API callers as a validation failure.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return local_instant(naive, value);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return local_instant(date.and_time(NaiveTime::MIN), value);
    }
    msg_bail_anyhow!(Message::InvalidTimestamp(value.to_string()))
}

fn local_instant(naive: NaiveDateTime, value: &str) -> Result<DateTime<Utc>> {
    // `earliest` resolves ambiguous instants around DST transitions
    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => Ok(local.with_timezone(&Utc)),
        None => msg_bail_anyhow!(Message::InvalidTimestamp(value.to_string())),
    }
}

/// Reduces an arbitrary accepted timestamp to the canonical storage form.
pub fn normalize_timestamp(value: &str) -> Result<String> {
    Ok(to_storage_string(parse_timestamp(value)?))
}

/// Computes the elapsed time between two stored timestamps.
pub fn sleep_duration(start: &str, end: &str) -> Result<SleepDuration> {
    let diff_ms = (parse_timestamp(end)? - parse_timestamp(start)?).num_milliseconds() as f64;
    Ok(SleepDuration {
        hours: (diff_ms / 3_600_000.0).floor() as i64,
        minutes: ((diff_ms / 60_000.0) % 60.0).round() as i64,
        total_minutes: (diff_ms / 60_000.0).round() as i64,
    })
}

/// Formats a stored timestamp as "MM月DD日HH时" in local time.
pub fn display_moment(timestamp: &str) -> Result<String> {
    let local = parse_timestamp(timestamp)?.with_timezone(&Local);
    Ok(local.format("%m月%d日%H时").to_string())
}

/// Formats a closed sleep session as "start-end 共睡了…".
///
/// Sessions shorter than an hour show minutes only; whole-hour sessions
/// omit the minute part.
pub fn display_session(start: &str, end: &str) -> Result<String> {
    let duration = sleep_duration(start, end)?;
    let elapsed = if duration.total_minutes < 60 {
        format!("共睡了{}分钟", duration.minutes)
    } else if duration.minutes == 0 {
        format!("共睡了{}小时", duration.hours)
    } else {
        format!("共睡了{}小时{}分钟", duration.hours, duration.minutes)
    };
    Ok(format!("{}-{} {}", display_moment(start)?, display_moment(end)?, elapsed))
}

/// Local calendar date ("YYYY-MM-DD") of a stored timestamp.
///
/// Statistics buckets sleep minutes by this key.
pub fn local_date_key(timestamp: &str) -> Result<String> {
    let local = parse_timestamp(timestamp)?.with_timezone(&Local);
    Ok(local.format("%Y-%m-%d").to_string())
}
