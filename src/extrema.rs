use crate::models::{ChartConfig, DataRow, VisualizationType};
use serde::{Deserialize, Serialize};

/// Raw value range across the active series, before any domain adjustment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SeriesExtrema {
    pub min_value: f64,
    pub max_value: f64,
    pub exist_positive_value: bool,
    /// Numeric cells counted.
    pub count: usize,
    /// Cells that were present but not numeric (suppression markers, blanks).
    pub skipped: usize,
}

/// Numeric values of one column, in row order. Non-numeric cells are skipped.
pub fn column_values<'r>(rows: &'r [DataRow], key: &'r str) -> impl Iterator<Item = f64> + 'r {
    rows.iter()
        .filter_map(move |row| row.get(key))
        .filter_map(|cell| cell.as_f64())
}

/// Scan every series column of `rows`.
///
/// Returns `None` when no series holds a single numeric value. Forecasting
/// interval columns are not included; the domain resolver adds them itself.
pub fn series_extrema(config: &ChartConfig, rows: &[DataRow]) -> Option<SeriesExtrema> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut count = 0usize;
    let mut skipped = 0usize;
    for row in rows {
        for key in config.series_keys() {
            match row.get(key).map(|c| c.as_f64()) {
                Some(Some(v)) => {
                    min = min.min(v);
                    max = max.max(v);
                    count += 1;
                }
                Some(None) => skipped += 1,
                None => {}
            }
        }
    }
    if count == 0 {
        return None;
    }
    Some(SeriesExtrema {
        min_value: min,
        max_value: max,
        exist_positive_value: max >= 0.0,
        count,
        skipped,
    })
}

/// Every series draws as a line (solid or dashed). Only meaningful for combo charts.
pub fn is_all_line(config: &ChartConfig) -> bool {
    config.visualization_type == VisualizationType::Combo
        && !config.series.is_empty()
        && config.series.iter().all(|s| s.role.is_line())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, SeriesDescriptor, SeriesRole};

    fn row(y: CellValue, z: CellValue) -> DataRow {
        [("y".to_string(), y), ("z".to_string(), z)].into_iter().collect()
    }

    fn config() -> ChartConfig {
        ChartConfig {
            series: vec![
                SeriesDescriptor {
                    data_key: "y".into(),
                    ..Default::default()
                },
                SeriesDescriptor {
                    data_key: "z".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn extrema_skip_markers_and_blanks() {
        let rows = vec![
            row(CellValue::from("-5"), CellValue::from(3.0)),
            row(CellValue::from("*"), CellValue::from(10.0)),
            row(CellValue::from(""), CellValue::Null),
        ];
        let e = series_extrema(&config(), &rows).unwrap();
        assert_eq!(e.min_value, -5.0);
        assert_eq!(e.max_value, 10.0);
        assert!(e.exist_positive_value);
        assert_eq!(e.count, 3);
        assert_eq!(e.skipped, 3);
    }

    #[test]
    fn all_negative_data_has_no_positive_value() {
        let rows = vec![row(CellValue::from(-2.0), CellValue::from(-1.0))];
        let e = series_extrema(&config(), &rows).unwrap();
        assert!(!e.exist_positive_value);
        assert!(series_extrema(&config(), &[]).is_none());
    }

    #[test]
    fn all_line_needs_combo_of_lines() {
        let mut cfg = config();
        assert!(!is_all_line(&cfg));
        cfg.visualization_type = VisualizationType::Combo;
        cfg.series[1].role = SeriesRole::DashedLarge;
        assert!(is_all_line(&cfg));
        cfg.series[1].role = SeriesRole::Bar;
        assert!(!is_all_line(&cfg));
    }
}
