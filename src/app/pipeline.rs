//! Shared "selection pipeline" logic.
//!
//! dataset (CSV or synthetic) -> selector validation -> search -> outcome
//!
//! The CLI handlers only deal with presentation and exports.

use std::path::Path;

use tracing::info;

use crate::data::{Dataset, SampleConfig, generate_sample};
use crate::domain::{SelectConfig, SelectionOutcome};
use crate::error::AppError;
use crate::fit::Selector;

/// All computed outputs of a single selection run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Dataset,
    /// Resolved candidate list (after defaulting to every non-response column).
    pub candidates: Vec<String>,
    pub outcome: SelectionOutcome,
}

/// Load (or generate) the dataset and run the configured search.
pub fn run_selection(
    data: Option<&Path>,
    sample: &SampleConfig,
    config: &SelectConfig,
) -> Result<RunOutput, AppError> {
    let dataset = match data {
        Some(path) => {
            let ingest = crate::io::load_dataset(path)?;
            if !ingest.row_errors.is_empty() {
                eprintln!(
                    "Skipped {} of {} rows in '{}' (run with -v for details).",
                    ingest.row_errors.len(),
                    ingest.rows_read,
                    path.display()
                );
            }
            ingest.dataset
        }
        None => {
            info!(rows = sample.rows, seed = sample.seed, "using synthetic sample");
            generate_sample(sample)?
        }
    };

    run_selection_on(dataset, config)
}

/// Run the configured search on an already-loaded dataset.
pub fn run_selection_on(dataset: Dataset, config: &SelectConfig) -> Result<RunOutput, AppError> {
    let (candidates, outcome) = {
        let selector = Selector::new(&dataset, config.clone())?;
        (selector.candidates().to_vec(), selector.run()?)
    };

    Ok(RunOutput {
        dataset,
        candidates,
        outcome,
    })
}
