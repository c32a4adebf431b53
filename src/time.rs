//! Time tags.
//!
//! Times are stored as plain tag values in one of three forms:
//!
//! | Format | Example |
//! |---|---|
//! | [`TimeFormat::Normal`] | `2024-3-7--9-5-0` (no zero padding) |
//! | [`TimeFormat::Iso`] | `i_2024-03-07T09:05:00` |
//! | [`TimeFormat::Timestamp`] | `s_1709802300.0` |
//!
//! `Normal` and `Iso` write the wall-clock time of the given zone;
//! `Timestamp` writes Unix seconds.
//!
//! ## Examples
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use tagstring::time::{format_time, parse_time, TimeFormat};
//!
//! let time = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap();
//! assert_eq!(format_time(&time, TimeFormat::Normal), "2024-3-7--9-5-0");
//! assert_eq!(format_time(&time, TimeFormat::Iso), "i_2024-03-07T09:05:00");
//!
//! let parsed = parse_time(&format_time(&time, TimeFormat::Iso)).unwrap();
//! assert_eq!(parsed, time.naive_utc());
//! ```

use chrono::{DateTime, Datelike, Local, NaiveDateTime, TimeZone, Timelike, Utc};
use std::fmt;

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const NORMAL_FORMAT: &str = "%Y-%m-%d--%H-%M-%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFormat {
    #[default]
    Normal,
    Iso,
    Timestamp,
}

#[must_use]
pub fn format_time<Tz>(time: &DateTime<Tz>, format: TimeFormat) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match format {
        TimeFormat::Normal => format!(
            "{}-{}-{}--{}-{}-{}",
            time.year(),
            time.month(),
            time.day(),
            time.hour(),
            time.minute(),
            time.second()
        ),
        TimeFormat::Iso => format!("i_{}", time.naive_local().format(ISO_FORMAT)),
        TimeFormat::Timestamp => {
            let seconds =
                time.timestamp() as f64 + f64::from(time.timestamp_subsec_nanos()) / 1e9;
            format!("s_{:?}", seconds)
        }
    }
}

/// Formats the current local time.
#[must_use]
pub fn format_now(format: TimeFormat) -> String {
    format_time(&Local::now(), format)
}

/// Reads back any of the three forms.
///
/// `Normal` and `Iso` give the wall-clock time they were written with;
/// `Timestamp` gives UTC. Returns `None` for anything else.
#[must_use]
pub fn parse_time(s: &str) -> Option<NaiveDateTime> {
    if let Some(iso) = s.strip_prefix("i_") {
        return NaiveDateTime::parse_from_str(iso, ISO_FORMAT).ok();
    }
    if let Some(stamp) = s.strip_prefix("s_") {
        let seconds: f64 = stamp.parse().ok()?;
        if !seconds.is_finite() {
            return None;
        }
        let whole = seconds.floor();
        let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
        return DateTime::<Utc>::from_timestamp(whole as i64, nanos).map(|t| t.naive_utc());
    }
    NaiveDateTime::parse_from_str(s, NORMAL_FORMAT).ok()
}
