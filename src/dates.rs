//! Timestamp parsing, timezone localisation and display helpers

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::error::{AppError, AppResult};

/// Display format of slot start times
pub const DISPLAY_FORMAT: &str = "%Y/%m/%d %H:%M";

#[derive(Debug, Clone, Copy)]
enum Layout {
    DateTime(&'static str),
    Date(&'static str),
    YearMonth,
}

/// Accepted request formats, tried in order; the first match wins.
const LAYOUTS: &[Layout] = &[
    Layout::DateTime("%Y-%m-%d %H:%M:%S%.f"),
    Layout::DateTime("%Y-%m-%dT%H:%M:%S%.f"),
    Layout::DateTime("%d.%m.%Y %H:%M:%S"),
    Layout::DateTime("%Y-%m-%dT%H:%M:%S"),
    Layout::DateTime("%Y-%m-%d %H:%M:%S"),
    Layout::DateTime("%d.%m.%Y %H:%M"),
    Layout::DateTime("%Y-%m-%d %H:%M"),
    Layout::Date("%d.%m.%Y"),
    Layout::Date("%Y-%m-%d"),
    Layout::YearMonth,
];

impl Layout {
    fn parse(self, input: &str) -> Option<NaiveDateTime> {
        match self {
            Layout::DateTime(fmt) => NaiveDateTime::parse_from_str(input, fmt).ok(),
            Layout::Date(fmt) => NaiveDate::parse_from_str(input, fmt)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN)),
            Layout::YearMonth => NaiveDate::parse_from_str(&format!("{}-01", input), "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN)),
        }
    }
}

/// Parse a request timestamp. Naive values are read as wall-clock time in `tz`;
/// RFC 3339 values carrying their own offset are accepted as-is.
pub fn parse_timestamp(input: &str, tz: &Tz) -> AppResult<DateTime<Utc>> {
    let input = input.trim();

    if let Some(naive) = LAYOUTS.iter().find_map(|layout| layout.parse(input)) {
        return Ok(localize(tz, naive));
    }

    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            AppError::Validation(format!(
                "time data '{}' did not match any supported format",
                input
            ))
        })
}

/// Parse a request date; timestamps are reduced to their calendar date in `tz`.
pub fn parse_date(input: &str, tz: &Tz) -> AppResult<NaiveDate> {
    parse_timestamp(input, tz).map(|dt| dt.with_timezone(tz).date_naive())
}

/// Resolve an optional timezone name, falling back to `default`
pub fn parse_timezone(name: Option<&str>, default: Tz) -> AppResult<Tz> {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name
            .parse::<Tz>()
            .map_err(|_| AppError::Validation(format!("Unknown timezone '{}'", name))),
        None => Ok(default),
    }
}

/// Convert wall-clock time in `tz` to UTC.
/// Ambiguous times take the earliest instant, times inside a DST gap are
/// shifted forward by one hour.
pub fn localize(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive)),
    }
}

/// Combine a calendar date with a wall-clock time in `tz`
pub fn combine(tz: &Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    localize(tz, date.and_time(time))
}

/// Calendar date of an instant in `tz`
pub fn local_date(tz: &Tz, instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Format an instant for display in `tz`
pub fn format_display(tz: &Tz, instant: DateTime<Utc>) -> String {
    instant.with_timezone(tz).format(DISPLAY_FORMAT).to_string()
}
