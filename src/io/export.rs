//! Read/write selection reports as JSON.
//!
//! A report is the portable form of a run: the full `SelectionOutcome` (steps,
//! per-iteration scores, final set) plus when and from what it was produced.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::domain::SelectionOutcome;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionReport {
    pub tool: String,
    pub generated: DateTime<Local>,
    /// CSV path, or `None` for a synthetic sample.
    pub source: Option<String>,
    pub nobs: usize,
    pub outcome: SelectionOutcome,
}

impl SelectionReport {
    pub fn new(outcome: SelectionOutcome, source: Option<String>, nobs: usize) -> Self {
        Self {
            tool: "autoselect".to_string(),
            generated: Local::now(),
            source,
            nobs,
            outcome,
        }
    }
}

/// Write a report JSON file.
pub fn write_report_json(path: &Path, report: &SelectionReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| {
            AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display()))
        })?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;
    Ok(())
}

/// Read a report JSON file.
pub fn read_report_json(path: &Path) -> Result<SelectionReport, AppError> {
    let file = File::open(path)
        .map_err(|e| {
            AppError::new(2, format!("Failed to open report JSON '{}': {e}", path.display()))
        })?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid report JSON: {e}")))
}
