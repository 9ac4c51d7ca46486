use crate::error::Result;
use crate::models::{CellValue, ChartConfig, DataRow};
use csv::ReaderBuilder;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Load a chart configuration from a JSON file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ChartConfig> {
    let text = fs::read_to_string(path)?;
    ChartConfig::from_json(&text)
}

/// Load data rows. `.json` files hold an array of objects; anything else is
/// read as CSV with a header row.
pub fn load_rows<P: AsRef<Path>>(path: P) -> Result<Vec<DataRow>> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    } else {
        read_csv_rows(File::open(path)?)
    }
}

/// CSV cells stay text so suppression markers survive; empty cells become null.
pub fn read_csv_rows<R: std::io::Read>(reader: R) -> Result<Vec<DataRow>> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let row: DataRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| {
                let cell = if v.is_empty() {
                    CellValue::Null
                } else {
                    CellValue::Text(v.to_string())
                };
                (h.to_string(), cell)
            })
            .collect();
        rows.push(row);
    }
    log::debug!("read {} rows with {} columns", rows.len(), headers.len());
    Ok(rows)
}

/// Save any result as pretty JSON.
pub fn save_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(value)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
