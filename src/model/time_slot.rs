//! Resolution of the portal's textual hour labels ("12 a.m.", "1  p.m.", ...)
//! into concrete timestamps.

use crate::error::TimeSlotError;
use chrono::{DateTime, LocalResult, NaiveDate, TimeZone};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Canonical hour labels, single-spaced, with the hour-of-day they stand for.
const HOUR_LABELS: [(&str, u32); 24] = [
    ("12 a.m.", 0),
    ("1 a.m.", 1),
    ("2 a.m.", 2),
    ("3 a.m.", 3),
    ("4 a.m.", 4),
    ("5 a.m.", 5),
    ("6 a.m.", 6),
    ("7 a.m.", 7),
    ("8 a.m.", 8),
    ("9 a.m.", 9),
    ("10 a.m.", 10),
    ("11 a.m.", 11),
    ("12 p.m.", 12),
    ("1 p.m.", 13),
    ("2 p.m.", 14),
    ("3 p.m.", 15),
    ("4 p.m.", 16),
    ("5 p.m.", 17),
    ("6 p.m.", 18),
    ("7 p.m.", 19),
    ("8 p.m.", 20),
    ("9 p.m.", 21),
    ("10 p.m.", 22),
    ("11 p.m.", 23),
];

static HOUR_TABLE: LazyLock<HashMap<&'static str, u32>> =
    LazyLock::new(|| HOUR_LABELS.into_iter().collect());

/// Maps an hour label to its hour-of-day (0-23).
///
/// Runs of whitespace inside the label are collapsed before lookup, so
/// "12  a.m." and "12 a.m." are the same slot.
pub fn hour_of_day(label: &str) -> Result<u32, TimeSlotError> {
    let normalized = label.split_whitespace().collect::<Vec<_>>().join(" ");
    HOUR_TABLE
        .get(normalized.as_str())
        .copied()
        .ok_or_else(|| TimeSlotError::Malformed(label.to_string()))
}

/// Resolves an hour label on `date` into a timestamp in `zone`.
///
/// When the local time is ambiguous (clocks falling back) the earlier instant
/// is used.
pub fn resolve<Tz: TimeZone + fmt::Debug>(
    label: &str,
    date: NaiveDate,
    zone: &Tz,
) -> Result<DateTime<Tz>, TimeSlotError> {
    let hour = hour_of_day(label)?;
    let nonexistent = || TimeSlotError::NonexistentLocalTime {
        date,
        hour,
        zone: format!("{:?}", zone),
    };
    let naive = date.and_hms_opt(hour, 0, 0).ok_or_else(nonexistent)?;

    match zone.from_local_datetime(&naive) {
        LocalResult::Single(timestamp) => Ok(timestamp),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(nonexistent()),
    }
}
