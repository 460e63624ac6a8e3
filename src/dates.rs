use std::sync::OnceLock;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::models::Cell;

/// Outcome of reading one date cell. Bad dates are data, not errors: the
/// caller decides whether to drop the row or reject the upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDate {
    Date(NaiveDate),
    Unparsed,
}

impl ParsedDate {
    pub fn date(self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(d),
            Self::Unparsed => None,
        }
    }
}

impl From<Option<NaiveDate>> for ParsedDate {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map_or(Self::Unparsed, Self::Date)
    }
}

// Tried in order; the month-first pass wins for ambiguous strings like 03/04/2024.
const MONTH_FIRST: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y%m%d",
    "%m/%d/%y",
    "%m-%d-%y",
    "%m.%d.%y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m.%d.%Y",
    "%B %d %Y",
    "%B-%d-%Y",
    "%d %B %Y",
    "%d-%B-%Y",
    "%d-%B-%y",
];

const DAY_FIRST: &[&str] = &[
    "%d/%m/%y",
    "%d-%m-%y",
    "%d.%m.%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
];

// Far outside anything a timesheet holds, well inside chrono's range.
const MAX_SERIAL_DAYS: f64 = 2_958_465.0;

fn time_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(.+?)(?:[ T]+\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?\s*(?:am|pm)?\s*(?:z|utc|gmt|[+-]\d{2}:?\d{2})?)$",
        )
        .expect("valid time suffix regex")
    })
}

fn ordinal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").expect("valid ordinal regex"))
}

fn weekday_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?,?\s+").expect("valid weekday regex")
    })
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

/// Spreadsheet day serial (epoch 1899-12-30) to a calendar date; time of day is floored away.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial.abs() > MAX_SERIAL_DAYS {
        return None;
    }
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// Same epoch, keeping the time of day carried in the fraction.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    let date = excel_serial_to_date(serial)?;
    let seconds = ((serial - serial.floor()) * 86_400.0).round() as i64;
    date.and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::seconds(seconds))
}

/// Strip time-of-day, ordinals, weekday names and commas so the format table stays small.
fn clean_date_text(raw: &str) -> String {
    let s = raw.trim();
    let s = match time_suffix_re().captures(s) {
        Some(caps) => caps.get(1).map_or(s, |m| m.as_str()),
        None => s,
    };
    let s = weekday_re().replace(s, "");
    let s = ordinal_re().replace_all(&s, "$1");
    let s = s.replace(',', " ");
    whitespace_re().replace_all(s.trim(), " ").into_owned()
}

// %Y accepts one to four digits, so "3/4/24" would otherwise read as year 3
fn parse_with(formats: &[&str], s: &str) -> Option<NaiveDate> {
    formats.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(s, fmt)
            .ok()
            .filter(|d| (1000..=9999).contains(&d.year()))
    })
}

/// Parse free text: month-first, then day-first.
pub fn parse_date_text(raw: &str) -> ParsedDate {
    let raw = raw.trim();
    if raw.is_empty() {
        return ParsedDate::Unparsed;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return ParsedDate::Date(dt.date_naive());
    }
    let cleaned = clean_date_text(raw);
    parse_with(MONTH_FIRST, &cleaned)
        .or_else(|| parse_with(DAY_FIRST, &cleaned))
        .into()
}

/// Read a date out of a cell of unknown representation. Never fails.
pub fn normalize_date(cell: &Cell) -> ParsedDate {
    match cell {
        Cell::DateTime(dt) => ParsedDate::Date(dt.date()),
        Cell::Number(n) => excel_serial_to_date(*n).into(),
        Cell::Empty => ParsedDate::Unparsed,
        // CSV readers hand serials over as text
        Cell::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(excel_serial_to_date)
            .map_or_else(|| parse_date_text(s), ParsedDate::Date),
        other => parse_date_text(&other.to_text()),
    }
}
