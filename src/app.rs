//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - loads or generates the dataset
//! - runs the chosen selection strategy
//! - prints the trace/summary and writes optional exports

use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, SampleArgs, SampleOpts, SelectArgs, ShowArgs};
use crate::data::SampleConfig;
use crate::domain::{SelectConfig, Strategy};
use crate::error::AppError;

pub mod pipeline;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "AUTOSELECT_LOG";

/// Entry point for the `autoselect` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Backward(args) => handle_select(Strategy::Backward, args),
        Command::Forward(args) => handle_select(Strategy::Forward, args),
        Command::Stepwise(args) => handle_select(Strategy::Stepwise, args),
        Command::Sample(args) => handle_sample(args),
        Command::Show(args) => handle_show(args),
    }
}

/// Install the stderr subscriber.
///
/// `AUTOSELECT_LOG` wins when set; otherwise `-v` picks `info`/`debug` for this crate.
pub fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "autoselect=info",
        _ => "autoselect=debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    // A second init (e.g. from tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_select(strategy: Strategy, args: SelectArgs) -> Result<(), AppError> {
    let config = select_config_from_args(strategy, &args);
    let sample = sample_config_from_opts(&args.sample);
    let run = pipeline::run_selection(args.data.as_deref(), &sample, &config)?;

    if !args.quiet {
        println!("{}", crate::report::format_trace(&run.outcome));
    }
    println!(
        "{}",
        crate::report::format_run_summary(&run.dataset, &run.candidates, &run.outcome)
    );

    if let Some(path) = &args.export {
        let report = crate::io::SelectionReport::new(
            run.outcome,
            args.data.as_ref().map(|p| p.display().to_string()),
            run.dataset.nrows(),
        );
        crate::io::write_report_json(path, &report)?;
    }

    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let dataset = crate::data::generate_sample(&sample_config_from_opts(&args.sample))?;
    write_dataset_csv(&args.out, &dataset)?;
    println!(
        "Wrote {} rows x {} columns to {}",
        dataset.nrows(),
        dataset.ncols(),
        args.out.display()
    );
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let report = crate::io::read_report_json(&args.report)?;
    println!("{}", crate::report::format_trace(&report.outcome));
    Ok(())
}

pub fn select_config_from_args(strategy: Strategy, args: &SelectArgs) -> SelectConfig {
    SelectConfig {
        strategy,
        criterion: args.criterion,
        response: args.response.clone(),
        predictors: args.predictors.clone(),
        start: args.start.clone(),
        intercept: !args.no_intercept,
        parallel: !args.sequential,
        cycle_guard: !args.allow_cycles,
    }
}

pub fn sample_config_from_opts(opts: &SampleOpts) -> SampleConfig {
    SampleConfig {
        rows: opts.rows,
        seed: opts.seed,
        noise_sd: opts.noise,
        noise_predictors: opts.noise_predictors,
        ..SampleConfig::default()
    }
}

fn write_dataset_csv(path: &Path, dataset: &crate::data::Dataset) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create CSV '{}': {e}", path.display())))?;
    writer
        .write_record(dataset.names())
        .map_err(|e| AppError::new(2, format!("Failed to write CSV header: {e}")))?;

    let columns = dataset.columns(dataset.names())?;
    for i in 0..dataset.nrows() {
        writer
            .write_record(columns.iter().map(|c| c[i].to_string()))
            .map_err(|e| AppError::new(2, format!("Failed to write CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush CSV: {e}")))?;
    Ok(())
}
