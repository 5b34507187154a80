//! Date coercion for spreadsheet cells.
//!
//! Imported sheets are hand-edited: the same "date" column may hold ISO
//! strings, `dd.mm.yyyy` strings, datetime text or raw Excel serial
//! numbers. Every helper here returns a plain `Option` — an unreadable
//! date is "no date", never an error.

use calamine::Data;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

/// Excel's day-number epoch, offset for the fictitious 1900-02-29.
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Largest serial Excel itself will render (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

fn iso_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"))
}

fn dotted_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").expect("valid regex"))
}

/// Datetime shapes tolerated by the last-resort fallback.
const FALLBACK_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Date shapes tolerated by the last-resort fallback.
const FALLBACK_DATE_FORMATS: [&str; 4] = ["%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y"];

/// Parse a strict ISO `YYYY-MM-DD` string into a calendar date.
pub fn parse_iso(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Coerce arbitrary cell text to ISO `YYYY-MM-DD`.
///
/// Accepted, in priority order: a datetime string whose prefix before the
/// first space is ISO-shaped; a bare ISO string; `dd.mm.yyyy`; a handful
/// of common datetime/date spellings. Shape checks only — `2025-02-31`
/// passes through unchanged, matching how the records store dates as text.
pub fn parse_date_str(value: &str) -> Option<String> {
    // "2025-12-09 00:00:00" style: only the date prefix matters
    if value.contains(' ') {
        let prefix = value.split(' ').next().unwrap_or("");
        if iso_date_re().is_match(prefix) {
            return Some(prefix.to_string());
        }
    }

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if iso_date_re().is_match(trimmed) {
        return Some(trimmed.to_string());
    }

    if dotted_date_re().is_match(trimmed) {
        let mut parts = trimmed.split('.');
        let (dd, mm, yyyy) = (parts.next()?, parts.next()?, parts.next()?);
        return Some(format!("{yyyy}-{mm}-{dd}"));
    }

    for fmt in FALLBACK_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date().format("%Y-%m-%d").to_string());
        }
    }
    for fmt in FALLBACK_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d.format("%Y-%m-%d").to_string());
        }
    }

    None
}

/// Convert an Excel serial day number to ISO `YYYY-MM-DD`.
///
/// Fractional day parts (the time of day) are truncated.
pub fn excel_serial_to_iso(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_EXCEL_SERIAL {
        return None;
    }
    let (y, m, d) = EXCEL_EPOCH;
    let base = NaiveDate::from_ymd_opt(y, m, d)?;
    let date = base.checked_add_signed(Duration::days(serial.trunc() as i64))?;
    Some(date.format("%Y-%m-%d").to_string())
}

/// Coerce a spreadsheet cell to ISO `YYYY-MM-DD`.
pub fn parse_date_cell(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => parse_date_str(s),
        Data::Float(f) => excel_serial_to_iso(*f),
        Data::Int(i) => excel_serial_to_iso(*i as f64),
        Data::DateTime(dt) => excel_serial_to_iso(dt.as_f64()),
        Data::DateTimeIso(s) => parse_date_str(s),
        _ => None,
    }
}

/// ISO-8601 week number of an ISO date string (weeks start Monday, week 1
/// holds the year's first Thursday). 0 when the input does not parse.
pub fn iso_week_of(date: &str) -> u32 {
    match parse_iso(date) {
        Some(d) => d.iso_week().week(),
        None => 0,
    }
}
