//! Command-line parsing for the model selection tool.
//!
//! Argument parsing and command dispatch are kept separate from the search
//! code, which only ever sees a resolved `SelectConfig`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Criterion;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "autoselect", version, about = "Automatic linear-regression variable selection")]
pub struct Cli {
    /// Verbose logging (repeat for more).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Backward elimination, starting from every candidate.
    Backward(SelectArgs),
    /// Forward selection, starting from `--start` (default: intercept only).
    Forward(SelectArgs),
    /// Bidirectional stepwise search, starting from `--start`.
    Stepwise(SelectArgs),
    /// Write a synthetic dataset to CSV.
    Sample(SampleArgs),
    /// Print the trace stored in a report JSON.
    Show(ShowArgs),
}

/// Options shared by the three search strategies.
#[derive(Debug, Args, Clone)]
pub struct SelectArgs {
    /// Input CSV (header row, numeric columns). Omit to use a synthetic sample.
    #[arg(long, value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Response column.
    #[arg(short = 'y', long, default_value = "y")]
    pub response: String,

    /// Candidate predictors (comma separated). Defaults to every other column.
    #[arg(short = 'x', long, value_delimiter = ',')]
    pub predictors: Option<Vec<String>>,

    /// Starting variables for forward/stepwise (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub start: Vec<String>,

    /// Score used to compare models.
    #[arg(long, value_enum, default_value_t = Criterion::Aic)]
    pub criterion: Criterion,

    /// Fit models without an intercept column.
    #[arg(long)]
    pub no_intercept: bool,

    /// Evaluate candidate models one at a time instead of on the thread pool.
    #[arg(long)]
    pub sequential: bool,

    /// Let stepwise search revisit variable sets (may not terminate).
    #[arg(long)]
    pub allow_cycles: bool,

    /// Only print the summary, not the per-iteration trace.
    #[arg(long)]
    pub quiet: bool,

    /// Export the run as JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    #[command(flatten)]
    pub sample: SampleOpts,
}

/// Synthetic sample settings (used when `--data` is absent, and by `sample`).
#[derive(Debug, Args, Clone)]
pub struct SampleOpts {
    /// Rows in the synthetic sample.
    #[arg(long, default_value_t = 200)]
    pub rows: usize,

    /// Random seed for the synthetic sample.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Noise standard deviation on the synthetic response.
    #[arg(long, default_value_t = 1.0)]
    pub noise: f64,

    /// Number of pure-noise predictors in the synthetic sample.
    #[arg(long, default_value_t = 2)]
    pub noise_predictors: usize,
}

/// Options for `sample`.
#[derive(Debug, Args)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(long, value_name = "CSV")]
    pub out: PathBuf,

    #[command(flatten)]
    pub sample: SampleOpts,
}

/// Options for `show`.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Report JSON produced by `--export`.
    #[arg(long, value_name = "JSON")]
    pub report: PathBuf,
}
