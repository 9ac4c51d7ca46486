//! Box plot statistics: quartiles, IQR fences and outliers per category.

use crate::extrema::column_values;
use crate::models::{CellValue, ChartConfig, DataRow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of one series within one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoxStats {
    /// Smallest non-outlier value.
    pub min: Option<f64>,
    /// Largest non-outlier value.
    pub max: Option<f64>,
    pub median: Option<f64>,
    pub first_quartile: f64,
    pub third_quartile: f64,
    pub iqr: f64,
    pub outliers: Vec<f64>,
    pub non_outliers: Vec<f64>,
}

/// One category (x-axis value) of a box plot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoxPlotGroup {
    pub category: String,
    pub series: BTreeMap<String, BoxStats>,
}

/// Linear-interpolated quantile of sorted values (R-7, as d3 uses).
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if p <= 0.0 || n == 1 {
        return Some(sorted[0]);
    }
    if p >= 1.0 {
        return Some(sorted[n - 1]);
    }
    let i = (n - 1) as f64 * p;
    let i0 = i.floor() as usize;
    let lo = sorted[i0];
    let hi = sorted[i0 + 1];
    Some(lo + (hi - lo) * (i - i0 as f64))
}

fn fences(q1: f64, q3: f64) -> (f64, f64) {
    let iqr = q3 - q1;
    (q1 - 1.5 * iqr, q3 + 1.5 * iqr)
}

pub fn outliers(values: &[f64], q1: f64, q3: f64) -> Vec<f64> {
    let (lo, hi) = fences(q1, q3);
    values.iter().copied().filter(|v| *v < lo || *v > hi).collect()
}

pub fn non_outliers(values: &[f64], q1: f64, q3: f64) -> Vec<f64> {
    let (lo, hi) = fences(q1, q3);
    values.iter().copied().filter(|v| *v >= lo && *v <= hi).collect()
}

/// Compute box statistics; `None` for an empty input.
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let q1 = quantile(&sorted, 0.25).unwrap_or(0.0);
    let q3 = quantile(&sorted, 0.75).unwrap_or(0.0);
    let inside = non_outliers(&sorted, q1, q3);
    Some(BoxStats {
        min: inside.first().copied(),
        max: inside.last().copied(),
        median: quantile(&sorted, 0.5),
        first_quartile: q1,
        third_quartile: q3,
        iqr: q3 - q1,
        outliers: outliers(values, q1, q3),
        non_outliers: non_outliers(values, q1, q3),
    })
}

fn category_label(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(s) => s.clone(),
        CellValue::Number(n) => crate::format::js_number_text(*n),
        CellValue::Bool(b) => b.to_string(),
        CellValue::Null => String::new(),
    }
}

/// Group rows by the x-axis column (first-seen order) and summarise every series.
pub fn create_plots(config: &ChartConfig, rows: &[DataRow]) -> Vec<BoxPlotGroup> {
    let category_key = config.x_axis.data_key.as_str();
    let mut order: Vec<String> = Vec::new();
    let mut grouped: BTreeMap<String, Vec<DataRow>> = BTreeMap::new();
    for row in rows {
        let label = row.get(category_key).map(category_label).unwrap_or_default();
        if !grouped.contains_key(&label) {
            order.push(label.clone());
        }
        grouped.entry(label).or_default().push(row.clone());
    }

    order
        .into_iter()
        .map(|category| {
            let members = grouped.remove(&category).unwrap_or_default();
            let series = config
                .series_keys()
                .filter_map(|key| {
                    let values: Vec<f64> = column_values(&members, key).collect();
                    box_stats(&values).map(|s| (key.to_string(), s))
                })
                .collect();
            BoxPlotGroup { category, series }
        })
        .collect()
}
