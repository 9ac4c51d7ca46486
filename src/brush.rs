//! Brush selection: a pixel range dragged over a date axis narrows the rows the
//! domain is derived from.

use crate::dates::{date_extent, parse_cell};
use crate::models::DataRow;
use chrono::{Datelike, NaiveDate};

fn day_number(d: NaiveDate) -> f64 {
    f64::from(d.num_days_from_ce())
}

/// Map a pixel offset on a `[0, width_px]` track back to a day number inside
/// `[first, last]`.
fn invert(px: f64, width_px: f64, first: f64, last: f64) -> f64 {
    first + (px / width_px) * (last - first)
}

/// Rows whose `key` date falls inside the brushed pixel range.
///
/// The track spans the date extent of `rows`. Rows with a missing or
/// unparseable date are always dropped. The two selection edges may come in
/// either order; a non-positive `width_px` selects the whole extent.
pub fn brush_filter(
    rows: &[DataRow],
    key: &str,
    pattern: Option<&str>,
    selection_px: (f64, f64),
    width_px: f64,
) -> Vec<DataRow> {
    let Some((lo, hi)) = date_extent(rows, key, pattern) else {
        return Vec::new();
    };
    let (first, last) = (day_number(lo), day_number(hi));
    let (from, to) = if width_px > 0.0 {
        let a = invert(selection_px.0, width_px, first, last);
        let b = invert(selection_px.1, width_px, first, last);
        (a.min(b), a.max(b))
    } else {
        (first, last)
    };

    let kept: Vec<DataRow> = rows
        .iter()
        .filter(|row| {
            row.get(key)
                .and_then(|c| parse_cell(c, pattern))
                .map(day_number)
                .is_some_and(|d| d >= from && d <= to)
        })
        .cloned()
        .collect();
    log::debug!("brush [{from}, {to}] kept {} of {} rows", kept.len(), rows.len());
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;

    fn rows() -> Vec<DataRow> {
        ["2020-01-01", "2020-01-11", "2020-01-21", "n/a", "2020-01-31"]
            .iter()
            .enumerate()
            .map(|(i, d)| {
                [
                    ("date".to_string(), CellValue::from(*d)),
                    ("y".to_string(), CellValue::from(i as f64)),
                ]
                .into_iter()
                .collect()
            })
            .collect()
    }

    fn dates_of(rows: &[DataRow]) -> Vec<String> {
        rows.iter()
            .map(|r| match &r["date"] {
                CellValue::Text(s) => s.clone(),
                other => format!("{other:?}"),
            })
            .collect()
    }

    #[test]
    fn selection_inside_keeps_middle_rows() {
        // 30 days over 300px: 10px per day
        let kept = brush_filter(&rows(), "date", None, (95.0, 205.0), 300.0);
        assert_eq!(dates_of(&kept), vec!["2020-01-11", "2020-01-21"]);
        let reversed = brush_filter(&rows(), "date", None, (205.0, 95.0), 300.0);
        assert_eq!(kept, reversed);
    }

    #[test]
    fn full_track_keeps_every_valid_date() {
        let kept = brush_filter(&rows(), "date", None, (0.0, 300.0), 300.0);
        assert_eq!(kept.len(), 4);
        assert!(!dates_of(&kept).contains(&"n/a".to_string()));
        assert_eq!(brush_filter(&rows(), "date", None, (0.0, 0.0), 0.0).len(), 4);
    }

    #[test]
    fn no_dates_means_nothing_selected() {
        assert!(brush_filter(&rows(), "missing", None, (0.0, 300.0), 300.0).is_empty());
        assert!(brush_filter(&[], "date", None, (0.0, 300.0), 300.0).is_empty());
    }
}
