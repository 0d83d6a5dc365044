//! Error types.
//!
//! - `SelectError` is what the library returns (typed, matchable).
//! - `AppError` is what the binary reports: a message plus a process exit code.

use thiserror::Error;

/// Errors raised by dataset access, scoring, and the selection loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectError {
    /// The design matrix is rank-deficient (collinear columns, or too few rows).
    #[error("Singular fit: design matrix has {columns} columns but rank {rank} (n={nobs})")]
    SingularFit {
        columns: usize,
        rank: usize,
        nobs: usize,
    },

    /// A response or predictor name is not a column of the dataset.
    #[error("Column not found: '{name}'")]
    ColumnNotFound { name: String },

    /// A variable list names the same variable twice.
    #[error("Duplicate variable '{name}'")]
    DuplicateVariable { name: String },

    /// A starting variable is not one of the candidate predictors.
    #[error("Start variable '{name}' is not a candidate predictor")]
    NotACandidate { name: String },

    /// The response column was also listed as a predictor.
    #[error("Response '{name}' cannot also be a predictor")]
    ResponseAsPredictor { name: String },

    /// Dataset columns have different lengths.
    #[error("Column '{name}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// A dataset cell is NaN or infinite (`row` is 0-based).
    #[error("Column '{name}' has a non-finite value at row {row}")]
    NonFiniteValue { name: String, row: usize },

    /// The least-squares fit produced a non-finite residual sum of squares.
    #[error("Non-finite fit: residual sum of squares is {ssr} ({columns} design columns)")]
    NonFiniteFit { columns: usize, ssr: f64 },

    /// The scorer produced NaN or an infinite criterion value.
    #[error("Non-finite score for model [{predictors}]")]
    NonFiniteScore { predictors: String },

    /// The dataset has no rows.
    #[error("Dataset is empty")]
    EmptyDataset,
}

impl SelectError {
    /// Exit code used when this error terminates the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            SelectError::SingularFit { .. } => 3,
            SelectError::NonFiniteScore { .. } | SelectError::NonFiniteFit { .. } => 4,
            _ => 2,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<SelectError> for AppError {
    fn from(err: SelectError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
