//! Date handling for date-typed axes.

use crate::models::{CellValue, DataRow};
use chrono::{Datelike, NaiveDate};

const FALLBACK_PATTERNS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y", "%Y/%m/%d"];
const DEFAULT_DISPLAY: &str = "%b %-d, %Y";

/// Parse a raw cell into a date. `pattern` is tried first, then a few common
/// layouts; a bare year maps to January 1st.
pub fn parse_date(raw: &str, pattern: Option<&str>) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(p) = pattern
        && let Ok(d) = NaiveDate::parse_from_str(raw, p)
    {
        return Some(d);
    }
    if let Some(d) = FALLBACK_PATTERNS
        .iter()
        .find_map(|p| NaiveDate::parse_from_str(raw, p).ok())
    {
        return Some(d);
    }
    // Timestamps such as "2024-03-01T12:00:00" keep only their date part.
    if let Some((date, _)) = raw.split_once('T') {
        return parse_date(date, pattern);
    }
    raw.parse::<i32>()
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
}

/// Date of a cell: text is parsed, whole numbers are read as years.
pub fn parse_cell(cell: &CellValue, pattern: Option<&str>) -> Option<NaiveDate> {
    match cell {
        CellValue::Text(s) => parse_date(s, pattern),
        CellValue::Number(n) if n.fract() == 0.0 => parse_date(&format!("{n}"), pattern),
        _ => None,
    }
}

/// Format a tick date. When `previous` falls in the same year the year is left
/// out, so a run of ticks shows each year once.
pub fn format_date(date: NaiveDate, previous: Option<NaiveDate>, pattern: Option<&str>) -> String {
    let pattern = pattern.unwrap_or(DEFAULT_DISPLAY);
    let same_year = previous.is_some_and(|p| p.year() == date.year());
    if same_year && pattern.contains("%Y") {
        let trimmed = pattern
            .replace("%Y", "")
            .trim_matches(|c: char| c == ',' || c == '/' || c == '-' || c.is_whitespace())
            .to_string();
        if !trimmed.is_empty() {
            return date.format(&trimmed).to_string();
        }
    }
    date.format(pattern).to_string()
}

/// Earliest and latest date in a column, ignoring unparseable cells.
pub fn date_extent(rows: &[DataRow], key: &str, pattern: Option<&str>) -> Option<(NaiveDate, NaiveDate)> {
    rows.iter()
        .filter_map(|r| r.get(key))
        .filter_map(|c| parse_cell(c, pattern))
        .fold(None, |acc, d| match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
        })
}
