//! CSV ingest.
//!
//! Turns a numeric CSV (one header row, one column per variable) into a
//! `Dataset`.
//!
//! - headers are trimmed and stripped of a UTF-8 BOM
//! - a row with an empty, non-numeric, or non-finite cell is skipped and reported
//! - no rows left after validation is an error (exit code 3)

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use crate::data::Dataset;
use crate::error::AppError;

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the dataset plus bookkeeping about skipped rows.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub dataset: Dataset,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a numeric CSV file.
pub fn load_dataset(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_dataset(file)
}

/// Read a numeric CSV from any reader.
pub fn read_dataset<R: Read>(source: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .iter()
        .map(normalize_header_name)
        .collect();

    if headers.is_empty() || headers.iter().any(String::is_empty) {
        return Err(AppError::new(2, "CSV header contains an empty column name."));
    }

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header; CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &headers) {
            Ok(values) => {
                for (col, v) in columns.iter_mut().zip(values) {
                    col.push(v);
                }
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    for err in &row_errors {
        warn!(line = err.line, "skipping row: {}", err.message);
    }

    let rows_used = rows_read - row_errors.len();
    if rows_used == 0 {
        return Err(AppError::new(3, "No valid rows remain after parsing."));
    }
    debug!(rows_read, rows_used, columns = headers.len(), "loaded dataset");

    let dataset = Dataset::from_columns(headers.into_iter().zip(columns))?;

    Ok(IngestedData {
        dataset,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn normalize_header_name(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').trim().to_string()
}

fn parse_row(record: &csv::StringRecord, headers: &[String]) -> Result<Vec<f64>, String> {
    if record.len() != headers.len() {
        return Err(format!(
            "expected {} fields, found {}",
            headers.len(),
            record.len()
        ));
    }

    record
        .iter()
        .zip(headers)
        .map(|(raw, name)| {
            if raw.is_empty() {
                return Err(format!("missing value for '{name}'"));
            }
            let v: f64 = raw
                .parse()
                .map_err(|_| format!("non-numeric value '{raw}' for '{name}'"))?;
            if !v.is_finite() {
                return Err(format!("non-finite value '{raw}' for '{name}'"));
            }
            Ok(v)
        })
        .collect()
}
