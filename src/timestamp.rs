// Timestamp interpretation - epoch integers to calendar instants and back to text
use crate::scanner::digit_len;
use chrono::{DateTime, Datelike, Local, SecondsFormat, TimeZone, Utc};

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

/// Relative-time unit ladder: divide down while the magnitude reaches the limit
const UNITS: [(f64, &str); 7] = [
    (60.0, "s"),
    (60.0, "m"),
    (24.0, "h"),
    (7.0, "d"),
    (4.345, "w"),
    (12.0, "mo"),
    (f64::INFINITY, "y"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Utc,
    Local,
}

/// 10 digits are seconds, 13 digits milliseconds; anything else is rejected
pub fn parse_unix(value: u64) -> Option<DateTime<Utc>> {
    let len = digit_len(value);
    let value = i64::try_from(value).ok()?;
    match len {
        10 => Utc.timestamp_opt(value, 0).single(),
        13 => Utc.timestamp_millis_opt(value).single(),
        _ => None,
    }
}

pub fn is_valid_date(instant: &DateTime<Utc>) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&instant.year())
}

/// Parse and range-check in one step
pub fn interpret(value: u64) -> Option<DateTime<Utc>> {
    parse_unix(value).filter(is_valid_date)
}

pub fn unix_seconds(instant: &DateTime<Utc>) -> i64 {
    instant.timestamp_millis().div_euclid(1000)
}

pub fn unix_millis(instant: &DateTime<Utc>) -> i64 {
    instant.timestamp_millis()
}

/// `2024-01-01 00:00:00.000 UTC` or `1/1/2024, 12:00:00 AM` in the local zone
pub fn format_date(instant: &DateTime<Utc>, zone: Zone) -> String {
    match zone {
        Zone::Utc => instant.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string(),
        Zone::Local => instant
            .with_timezone(&Local)
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string(),
    }
}

/// `2024-01-01T00:00:00.000Z`
pub fn format_iso8601(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn relative_time(instant: &DateTime<Utc>) -> String {
    relative_time_from(&Utc::now(), instant)
}

/// `45s ago`, `3m ago`, `in 1m`, `2mo ago`
pub fn relative_time_from(now: &DateTime<Utc>, instant: &DateTime<Utc>) -> String {
    let diff_ms = now.timestamp_millis() - instant.timestamp_millis();
    // Half-up rounding, so -0.5s is "0s ago"
    let delta = (diff_ms as f64 / 1000.0 + 0.5).floor() as i64;

    let mut magnitude = delta.unsigned_abs() as f64;
    let mut unit = "s";
    for (limit, name) in UNITS {
        if magnitude < limit {
            unit = name;
            break;
        }
        magnitude /= limit;
    }

    let rounded = magnitude.floor() as u64;
    if delta >= 0 {
        format!("{}{} ago", rounded, unit)
    } else {
        format!("in {}{}", rounded, unit)
    }
}
