//! Domain types used throughout the selection pipeline.
//!
//! This module defines:
//!
//! - run configuration (`Strategy`, `Criterion`, `SelectConfig`)
//! - per-iteration trace records (`CandidateScore`, `IterationTrace`)
//! - search outputs (`StepEntry`, `SelectionOutcome`)

pub mod types;

pub use types::*;
