//! Forgiving "date-ish" parsing
//!
//! Turns heterogeneous inputs (native chrono values, integers, digit runs,
//! delimited digit strings) into a single canonical `NaiveDateTime`.
//! Everything date-shaped in this crate passes through [`parse`] before it
//! touches a template or a directory.
//!
//! Accepted string forms:
//! - unix timestamp: exactly 10 digits starting with `1` (valid 2001-2033)
//! - digit run: `YYYYMMDD` plus optional two-digit chunks for hour, minute,
//!   second (trailing digits beyond seconds are discarded)
//! - delimited: four-digit year, then two-digit parts separated by runs of
//!   `-`, `_`, space, or `:`
//!
//! Two-digit parts must be zero-padded; `2023-6-5` is rejected rather than
//! guessed at, which keeps `03` o'clock distinguishable from `30` minutes
//! inside a flat digit run.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateishError {
    #[error("can't turn '{input}' into a date-time: {reason}")]
    InvalidDateFormat { input: String, reason: String },

    #[error("delimited date '{0}' has non-digits between delimiters")]
    NonDigitsInDelimitedDate(String),

    #[error("delimited date '{0}' has non-two-digit parts (no zero padding?)")]
    NonTwoDigitDateParts(String),
}

impl DateishError {
    fn invalid(input: &str, reason: impl Into<String>) -> Self {
        DateishError::InvalidDateFormat {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Any input value the forgiving parser accepts.
///
/// Public APIs take `impl Into<Dateish>`, so callers can hand over a
/// `NaiveDateTime`, a `NaiveDate`, an integer, or a string without
/// pre-converting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dateish {
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Number(i64),
    Text(String),
}

impl From<NaiveDateTime> for Dateish {
    fn from(dt: NaiveDateTime) -> Self {
        Dateish::DateTime(dt)
    }
}

impl From<NaiveDate> for Dateish {
    fn from(d: NaiveDate) -> Self {
        Dateish::Date(d)
    }
}

impl From<DateTime<Utc>> for Dateish {
    fn from(dt: DateTime<Utc>) -> Self {
        Dateish::DateTime(dt.naive_utc())
    }
}

impl From<DateTime<Local>> for Dateish {
    fn from(dt: DateTime<Local>) -> Self {
        Dateish::DateTime(dt.naive_local())
    }
}

impl From<i64> for Dateish {
    fn from(n: i64) -> Self {
        Dateish::Number(n)
    }
}

impl From<&str> for Dateish {
    fn from(s: &str) -> Self {
        Dateish::Text(s.to_string())
    }
}

impl From<String> for Dateish {
    fn from(s: String) -> Self {
        Dateish::Text(s)
    }
}

/// Delimiters recognized between two-digit parts of a delimited date.
fn is_delimiter(c: char) -> bool {
    matches!(c, '-' | '_' | ' ' | ':')
}

fn is_digit_string(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Converts any date-ish value into a canonical `NaiveDateTime`.
///
/// Native date/time values pass through unchanged; everything else is
/// rendered to a string and run through the digit-run or delimited rules.
pub fn parse(date_ish: impl Into<Dateish>) -> Result<NaiveDateTime, DateishError> {
    match date_ish.into() {
        Dateish::DateTime(dt) => Ok(dt),
        Dateish::Date(d) => Ok(d.and_time(NaiveTime::MIN)),
        Dateish::Number(n) => parse_str(&n.to_string()),
        Dateish::Text(s) => parse_str(&s),
    }
}

fn parse_str(s: &str) -> Result<NaiveDateTime, DateishError> {
    if is_digit_string(s) {
        from_digit_string(s)
    } else {
        from_delimited(s)
    }
}

/// Exactly 10 digits starting with `1`. Only plausible for timestamps
/// between Sept 2001 and mid-2033; a deliberate, narrow heuristic.
fn looks_like_unix_timestamp(s: &str) -> bool {
    is_digit_string(s) && s.len() == 10 && s.starts_with('1')
}

fn from_digit_string(s: &str) -> Result<NaiveDateTime, DateishError> {
    if looks_like_unix_timestamp(s) {
        let secs: i64 = s
            .parse()
            .map_err(|_| DateishError::invalid(s, "unix timestamp out of range"))?;
        return DateTime::from_timestamp(secs, 0)
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| DateishError::invalid(s, "unix timestamp out of range"));
    }

    if s.len() < 8 {
        return Err(DateishError::invalid(
            s,
            "all-digit string doesn't parse as date string or unix timestamp",
        ));
    }

    let year = parse_year(s, &s[..4])?;
    let mut parts = Vec::new();
    let mut rest = &s[4..];
    // Two-digit chunks in temporal order; digits past seconds are discarded.
    while rest.len() >= 2 && parts.len() < 5 {
        parts.push(parse_two_digits(s, &rest[..2])?);
        rest = &rest[2..];
    }
    datetime_from_parts(s, year, &parts)
}

fn from_delimited(s: &str) -> Result<NaiveDateTime, DateishError> {
    let year_digits = s.get(..4).filter(|y| is_digit_string(y)).ok_or_else(|| {
        DateishError::invalid(s, "doesn't obviously start with a year")
    })?;
    let year = parse_year(s, year_digits)?;

    let mut rest = &s[4..];
    if let Some(first) = rest.chars().next() {
        if is_delimiter(first) {
            rest = &rest[first.len_utf8()..];
        }
    }

    let mut parts = Vec::new();
    for part in rest.split(is_delimiter).filter(|p| !p.is_empty()) {
        if !is_digit_string(part) {
            return Err(DateishError::NonDigitsInDelimitedDate(s.to_string()));
        }
        if part.len() != 2 {
            return Err(DateishError::NonTwoDigitDateParts(s.to_string()));
        }
        parts.push(parse_two_digits(s, part)?);
    }
    datetime_from_parts(s, year, &parts)
}

fn parse_year(input: &str, digits: &str) -> Result<i32, DateishError> {
    digits
        .parse()
        .map_err(|_| DateishError::invalid(input, "year digits out of range"))
}

fn parse_two_digits(input: &str, digits: &str) -> Result<u32, DateishError> {
    digits
        .parse()
        .map_err(|_| DateishError::invalid(input, "date part digits out of range"))
}

/// Builds the datetime positionally: year, then month, day, hour, minute,
/// second. Parts past seconds are an error here (the digit-run path never
/// produces them; the delimited path can).
fn datetime_from_parts(
    input: &str,
    year: i32,
    parts: &[u32],
) -> Result<NaiveDateTime, DateishError> {
    if parts.len() > 5 {
        return Err(DateishError::invalid(
            input,
            "too many date parts (nothing is expected after seconds)",
        ));
    }

    let month = parts.first().copied().unwrap_or(1);
    let day = parts.get(1).copied().unwrap_or(1);
    let hour = parts.get(2).copied().unwrap_or(0);
    let minute = parts.get(3).copied().unwrap_or(0);
    let second = parts.get(4).copied().unwrap_or(0);

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        DateishError::invalid(
            input,
            format!("calendar rejected year={year} month={month} day={day}"),
        )
    })?;
    let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
        DateishError::invalid(
            input,
            format!("clock rejected hour={hour} minute={minute} second={second}"),
        )
    })?;
    Ok(date.and_time(time))
}
