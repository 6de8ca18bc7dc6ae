//! Canonical text form of `born_in` timestamps.
//!
//! Timestamps are written as RFC 3339 in UTC with a `Z` suffix and only as
//! many fractional digits as the value needs, e.g. `1990-05-15T00:00:00Z`.
//! Parsing that text gives back the exact same instant.
//!
//! Years outside `0000..=9999` are written with a sign and as many digits as
//! needed (`-0500-01-01T00:00:00Z`, `+10000-01-01T00:00:00Z`). Strict RFC 3339
//! has no room for them, so the parser accepts that expanded form as well.
//!
//! On the way in, the parser is more forgiving. It also accepts RFC 3339 with
//! any offset (normalised to UTC), naive ISO-8601 date-times such as
//! `1990-05-15T00:00:00` and bare dates such as `1990-05-15`. Values without
//! an offset are read as UTC.

use crate::error::{AmityError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

// `%Y` reads signed and expanded years; `%.f` is optional when parsing.
const EXPANDED_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S%.f";
const EXPANDED_DATE_TIME_OFFSET: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

/// Renders a timestamp in canonical form.
pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses any accepted timestamp form.
pub fn parse(text: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Some(body) = text.strip_suffix('Z')
        && let Ok(naive) = NaiveDateTime::parse_from_str(body, EXPANDED_DATE_TIME)
    {
        return Ok(naive.and_utc());
    }
    if let Ok(ts) = DateTime::parse_from_str(text, EXPANDED_DATE_TIME_OFFSET) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = text.parse::<NaiveDateTime>() {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = text.parse::<NaiveDate>() {
        return midnight(date);
    }
    Err(AmityError::Timestamp(format!(
        "'{text}' is not an RFC 3339 timestamp, an ISO-8601 date-time or a date"
    )))
}

/// Midnight UTC of the given calendar day.
///
/// # Errors
///
/// Fails with [`AmityError::Timestamp`] for days that do not exist.
pub fn date(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        AmityError::Timestamp(format!("{year:04}-{month:02}-{day:02} is not a valid date"))
    })?;
    midnight(date)
}

fn midnight(date: NaiveDate) -> Result<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AmityError::Timestamp(format!("no midnight on {date}")))
}
