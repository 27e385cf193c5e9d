//! Filename templates with embedded date/time fields
//!
//! A template is a filename with strftime-style field codes in it:
//!
//! - `daily_update_%Y-%m-%d.txt`
//! - `mydaemon_<%Y_%m_%d_%H%M>.log` (angle brackets around the date part
//!   are accepted and stripped, for compatibility with the older bracketed
//!   grammar)
//! - `updates%Y%m%d_dev.ndj.gz`
//!
//! Supported codes: `%Y` (four-digit year), `%m` `%d` `%H` `%M` `%S`
//! (two-digit, zero-padded), `%s` (unix seconds), `%Q` (unix milliseconds),
//! `%n` (an arbitrary run of digits, ignored when recovering the date), and
//! `%%` for a literal percent sign.
//!
//! Calendar fields must run in temporal order without gaps (year, month,
//! day, hour, minute, second), each at most once, starting at `%Y`; unix
//! fields cannot be mixed with calendar fields. Violations are rejected at
//! compile time rather than silently mis-parsed.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::dated_file::DatedFile;
use super::dateish::{self, Dateish, DateishError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("invalid template '{template}': {reason}")]
    InvalidTemplateFormat { template: String, reason: String },

    #[error("'{filename}' does not match template '{template}'")]
    Mismatch { template: String, filename: String },

    #[error(transparent)]
    Date(#[from] DateishError),
}

impl TemplateError {
    fn invalid(template: &str, reason: impl Into<String>) -> Self {
        TemplateError::InvalidTemplateFormat {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}

/// The typed numeric fields a template can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Year4,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    UnixSeconds,
    UnixMillis,
    /// A run of one or more digits with no date meaning (`%n`).
    Digits,
}

impl FieldKind {
    fn from_code(c: char) -> Option<FieldKind> {
        match c {
            'Y' => Some(FieldKind::Year4),
            'm' => Some(FieldKind::Month),
            'd' => Some(FieldKind::Day),
            'H' => Some(FieldKind::Hour),
            'M' => Some(FieldKind::Minute),
            'S' => Some(FieldKind::Second),
            's' => Some(FieldKind::UnixSeconds),
            'Q' => Some(FieldKind::UnixMillis),
            'n' => Some(FieldKind::Digits),
            _ => None,
        }
    }

    /// Position in the fixed temporal order, for calendar fields only.
    fn temporal_rank(self) -> Option<u8> {
        match self {
            FieldKind::Year4 => Some(0),
            FieldKind::Month => Some(1),
            FieldKind::Day => Some(2),
            FieldKind::Hour => Some(3),
            FieldKind::Minute => Some(4),
            FieldKind::Second => Some(5),
            _ => None,
        }
    }

    fn is_unix(self) -> bool {
        matches!(self, FieldKind::UnixSeconds | FieldKind::UnixMillis)
    }

    fn pattern(self) -> &'static str {
        match self {
            FieldKind::Year4 => r"(\d{4})",
            FieldKind::Month
            | FieldKind::Day
            | FieldKind::Hour
            | FieldKind::Minute
            | FieldKind::Second => r"(\d{2})",
            FieldKind::UnixSeconds | FieldKind::UnixMillis | FieldKind::Digits => r"(\d+)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Field(FieldKind),
}

#[derive(Debug)]
struct TemplateInner {
    /// The template exactly as given, brackets and all.
    template_string: String,
    tokens: Vec<Token>,
    /// Non-literal field kinds, one per capture group, in template order.
    fields: Vec<FieldKind>,
    /// Whole-string matcher; partial matches are not matches.
    matcher: Regex,
}

/// A compiled filename template.
///
/// Cheap to clone: the compiled spec is immutable and shared behind an
/// `Arc`, so any number of [`DatedFile`] and directory views can reference
/// one template without synchronization.
#[derive(Debug, Clone)]
pub struct Template {
    inner: Arc<TemplateInner>,
}

static FIELD_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"%.").expect("field-code regex is valid")
});

impl Template {
    /// Compiles a template string into a generator/matcher pair.
    pub fn compile(template: &str) -> Result<Template, TemplateError> {
        let stripped: String = template.chars().filter(|c| !matches!(c, '<' | '>')).collect();
        let tokens = tokenize(template, &stripped)?;
        let fields: Vec<FieldKind> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Field(kind) => Some(*kind),
                Token::Literal(_) => None,
            })
            .collect();
        validate_field_order(template, &fields)?;

        let mut pattern = String::from("^");
        for token in &tokens {
            match token {
                Token::Literal(text) => pattern.push_str(&regex::escape(text)),
                Token::Field(kind) => pattern.push_str(kind.pattern()),
            }
        }
        pattern.push('$');
        let matcher = Regex::new(&pattern)
            .map_err(|e| TemplateError::invalid(template, format!("bad matcher: {e}")))?;

        Ok(Template {
            inner: Arc::new(TemplateInner {
                template_string: template.to_string(),
                tokens,
                fields,
                matcher,
            }),
        })
    }

    /// The template string as originally given.
    pub fn template_string(&self) -> &str {
        &self.inner.template_string
    }

    /// Whether the template contains any date-bearing field at all. A
    /// field-less template is a fixed literal that matches exactly itself.
    pub fn has_date_fields(&self) -> bool {
        self.inner.fields.iter().any(|f| *f != FieldKind::Digits)
    }

    /// Computes the filename for the given date-ish value.
    pub fn filename_for(&self, date_ish: impl Into<Dateish>) -> Result<String, TemplateError> {
        let dt = dateish::parse(date_ish)?;
        self.render(dt)
    }

    fn render(&self, dt: NaiveDateTime) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.inner.template_string.len());
        for token in &self.inner.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Field(FieldKind::Year4) => out.push_str(&format!("{:04}", dt.year())),
                Token::Field(FieldKind::Month) => out.push_str(&format!("{:02}", dt.month())),
                Token::Field(FieldKind::Day) => out.push_str(&format!("{:02}", dt.day())),
                Token::Field(FieldKind::Hour) => out.push_str(&format!("{:02}", dt.hour())),
                Token::Field(FieldKind::Minute) => out.push_str(&format!("{:02}", dt.minute())),
                Token::Field(FieldKind::Second) => out.push_str(&format!("{:02}", dt.second())),
                Token::Field(FieldKind::UnixSeconds) => {
                    out.push_str(&dt.and_utc().timestamp().to_string())
                }
                Token::Field(FieldKind::UnixMillis) => {
                    out.push_str(&dt.and_utc().timestamp_millis().to_string())
                }
                Token::Field(FieldKind::Digits) => {
                    return Err(TemplateError::invalid(
                        self.template_string(),
                        "the arbitrary-digits field %n has no value for a date",
                    ));
                }
            }
        }
        Ok(out)
    }

    /// Whole-string match against a candidate filename.
    pub fn is_match(&self, filename: &str) -> bool {
        self.inner.matcher.is_match(filename)
    }

    /// Recovers the embedded date from a conforming filename.
    ///
    /// Fails with [`TemplateError::Mismatch`] when the filename does not
    /// match, and with a date error when the captured digits do not form a
    /// valid calendar date. A matched-but-nonsensical filename is always an
    /// explicit error, never an epoch default.
    pub fn extract_datetime(&self, filename: &str) -> Result<NaiveDateTime, TemplateError> {
        let captures = self.inner.matcher.captures(filename).ok_or_else(|| {
            TemplateError::Mismatch {
                template: self.template_string().to_string(),
                filename: filename.to_string(),
            }
        })?;

        let mut year: Option<&str> = None;
        let mut calendar_parts: Vec<&str> = Vec::new();
        for (kind, capture) in self.inner.fields.iter().zip(captures.iter().skip(1)) {
            let digits = match capture {
                Some(m) => m.as_str(),
                None => continue,
            };
            match kind {
                FieldKind::UnixSeconds => {
                    let secs: i64 = digits.parse().map_err(|_| {
                        DateishError::InvalidDateFormat {
                            input: digits.to_string(),
                            reason: "unix seconds out of range".to_string(),
                        }
                    })?;
                    return DateTime::from_timestamp(secs, 0)
                        .map(|dt| dt.naive_utc())
                        .ok_or_else(|| {
                            DateishError::InvalidDateFormat {
                                input: digits.to_string(),
                                reason: "unix seconds out of range".to_string(),
                            }
                            .into()
                        });
                }
                FieldKind::UnixMillis => {
                    let millis: i64 = digits.parse().map_err(|_| {
                        DateishError::InvalidDateFormat {
                            input: digits.to_string(),
                            reason: "unix milliseconds out of range".to_string(),
                        }
                    })?;
                    return DateTime::from_timestamp_millis(millis)
                        .map(|dt| dt.naive_utc())
                        .ok_or_else(|| {
                            DateishError::InvalidDateFormat {
                                input: digits.to_string(),
                                reason: "unix milliseconds out of range".to_string(),
                            }
                            .into()
                        });
                }
                FieldKind::Digits => {}
                FieldKind::Year4 => year = Some(digits),
                _ => calendar_parts.push(digits),
            }
        }

        // Reassemble the captures into the delimited form the forgiving
        // parser expects, so extraction and direct parsing share one set of
        // validation rules.
        let year = year.ok_or_else(|| {
            TemplateError::invalid(self.template_string(), "no date field to extract")
        })?;
        let mut reassembled = String::from(year);
        if calendar_parts.is_empty() {
            reassembled.push('-');
        }
        for part in calendar_parts {
            reassembled.push('-');
            reassembled.push_str(part);
        }
        Ok(dateish::parse(reassembled.as_str())?)
    }

    /// Resolves a comparand the template-aware way: a string that matches
    /// this template is decoded through it, anything else goes through the
    /// forgiving parser directly.
    pub fn resolve(&self, date_ish: impl Into<Dateish>) -> Result<NaiveDateTime, TemplateError> {
        match date_ish.into() {
            Dateish::Text(s) if self.is_match(&s) => self.extract_datetime(&s),
            other => Ok(dateish::parse(other)?),
        }
    }

    /// The [`DatedFile`] this template produces for the given date.
    pub fn at(&self, date_ish: impl Into<Dateish>) -> Result<DatedFile, TemplateError> {
        DatedFile::from_date(self, date_ish)
    }

    /// Alias for [`Template::at`].
    pub fn on(&self, date_ish: impl Into<Dateish>) -> Result<DatedFile, TemplateError> {
        self.at(date_ish)
    }

    /// The dated file for right now.
    pub fn now(&self) -> Result<DatedFile, TemplateError> {
        self.at(Local::now().naive_local())
    }

    /// Alias for [`Template::now`].
    pub fn today(&self) -> Result<DatedFile, TemplateError> {
        self.now()
    }

    pub fn tomorrow(&self) -> Result<DatedFile, TemplateError> {
        self.at(Local::now().naive_local() + Duration::days(1))
    }

    pub fn yesterday(&self) -> Result<DatedFile, TemplateError> {
        self.at(Local::now().naive_local() - Duration::days(1))
    }

    /// Every calendar day from `start` through today, ascending and
    /// inclusive on both ends. Empty when `start` is in the future.
    pub fn daily_since(&self, start: impl Into<Dateish>) -> Result<DailyRange, TemplateError> {
        let from = dateish::parse(start)?.date();
        self.daily_range(from, Local::now().date_naive())
    }

    /// Like [`Template::daily_since`], without today.
    pub fn daily_through_yesterday(
        &self,
        start: impl Into<Dateish>,
    ) -> Result<DailyRange, TemplateError> {
        let from = dateish::parse(start)?.date();
        let yesterday = Local::now().date_naive().pred_opt().unwrap_or(NaiveDate::MIN);
        self.daily_range(from, yesterday)
    }

    /// Like [`Template::daily_since`], without the start day itself.
    pub fn daily_after(&self, start: impl Into<Dateish>) -> Result<DailyRange, TemplateError> {
        let from = dateish::parse(start)?.date();
        let from = from.succ_opt().unwrap_or(NaiveDate::MAX);
        self.daily_range(from, Local::now().date_naive())
    }

    fn daily_range(&self, from: NaiveDate, until: NaiveDate) -> Result<DailyRange, TemplateError> {
        // Surface un-generatable templates here instead of mid-iteration.
        if self.inner.fields.contains(&FieldKind::Digits) {
            return Err(TemplateError::invalid(
                self.template_string(),
                "the arbitrary-digits field %n has no value for a date",
            ));
        }
        Ok(DailyRange {
            template: self.clone(),
            next: from,
            until,
        })
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.template_string())
    }
}

/// Templates compare equal when compiled from the same string.
impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.inner.template_string == other.inner.template_string
    }
}

impl Eq for Template {}

/// Bounded ascending iterator over one [`DatedFile`] per calendar day.
#[derive(Debug, Clone)]
pub struct DailyRange {
    template: Template,
    next: NaiveDate,
    until: NaiveDate,
}

impl Iterator for DailyRange {
    type Item = DatedFile;

    fn next(&mut self) -> Option<DatedFile> {
        if self.next > self.until {
            return None;
        }
        let day = self.next;
        match day.succ_opt() {
            Some(n) => self.next = n,
            None => self.until = NaiveDate::MIN,
        }
        // Generation cannot fail here: %n templates are rejected when the
        // range is built.
        DatedFile::from_date(&self.template, day).ok()
    }
}

fn tokenize(template: &str, stripped: &str) -> Result<Vec<Token>, TemplateError> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut literal = String::new();
    let mut last = 0;

    for m in FIELD_CODE.find_iter(stripped) {
        literal.push_str(&stripped[last..m.start()]);
        last = m.end();

        let code = match m.as_str().chars().nth(1) {
            Some(c) => c,
            None => continue,
        };
        if code == '%' {
            literal.push('%');
            continue;
        }
        let kind = FieldKind::from_code(code).ok_or_else(|| {
            TemplateError::invalid(template, format!("unrecognized field code '%{code}'"))
        })?;
        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }
        tokens.push(Token::Field(kind));
    }
    // Only a trailing lone '%' can survive the field-code scan.
    if stripped[last..].contains('%') {
        return Err(TemplateError::invalid(template, "dangling '%' at end of template"));
    }
    literal.push_str(&stripped[last..]);
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}

fn validate_field_order(template: &str, fields: &[FieldKind]) -> Result<(), TemplateError> {
    let calendar: Vec<FieldKind> = fields
        .iter()
        .copied()
        .filter(|f| f.temporal_rank().is_some())
        .collect();
    let unix_count = fields.iter().filter(|f| f.is_unix()).count();

    if unix_count > 0 && !calendar.is_empty() {
        return Err(TemplateError::invalid(
            template,
            "unix-timestamp fields cannot be mixed with calendar fields",
        ));
    }
    if unix_count > 1 {
        return Err(TemplateError::invalid(
            template,
            "at most one unix-timestamp field is allowed",
        ));
    }
    if !calendar.is_empty() {
        if calendar[0] != FieldKind::Year4 {
            return Err(TemplateError::invalid(
                template,
                "calendar templates must include %Y before any other field",
            ));
        }
        for pair in calendar.windows(2) {
            let (a, b) = (pair[0].temporal_rank(), pair[1].temporal_rank());
            // Contiguity matters too: %Y%H would decode its hour digits as a
            // month, so gaps are rejected along with reordering.
            if b != a.map(|r| r + 1) {
                return Err(TemplateError::invalid(
                    template,
                    "calendar fields must run in order without gaps (year, month, day, hour, minute, second), each at most once",
                ));
            }
        }
    }
    Ok(())
}
