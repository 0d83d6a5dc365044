//! `autoselect` library crate.
//!
//! Greedy linear-regression variable selection (backward, forward, stepwise)
//! scored by an information criterion.
//!
//! The binary (`autoselect`) is a thin wrapper around this library so that:
//!
//! - the search is testable without spawning processes
//! - the selector can be driven directly from other code

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod report;

pub use data::Dataset;
pub use domain::{Criterion, SelectConfig, SelectionOutcome, Strategy};
pub use error::SelectError;
pub use fit::{Selector, backward_selection, forward_selection, stepwise_selection};
