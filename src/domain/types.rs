//! Shared domain types.
//!
//! These types are kept lightweight and serializable so they can be:
//!
//! - used in-memory during the search
//! - rendered as a text trace
//! - exported to JSON

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::math::OlsFit;

/// Greedy search strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Start from every candidate and drop one variable per step.
    Backward,
    /// Start from the seed set and add one variable per step.
    Forward,
    /// Consider both drops and adds each step; drops win.
    Stepwise,
}

impl Strategy {
    pub fn display_name(self) -> &'static str {
        match self {
            Strategy::Backward => "backward",
            Strategy::Forward => "forward",
            Strategy::Stepwise => "stepwise",
        }
    }
}

/// Information criterion used as the model score. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    Aic,
    Bic,
}

impl Criterion {
    pub fn display_name(self) -> &'static str {
        match self {
            Criterion::Aic => "AIC",
            Criterion::Bic => "BIC",
        }
    }

    /// Read this criterion off a fitted model.
    pub fn score(self, fit: &OlsFit) -> f64 {
        match self {
            Criterion::Aic => fit.aic,
            Criterion::Bic => fit.bic,
        }
    }
}

/// Direction of a candidate move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Add,
    Drop,
}

impl Direction {
    /// Trace marker (`+` for additions, `-` for removals).
    pub fn marker(self) -> char {
        match self {
            Direction::Add => '+',
            Direction::Drop => '-',
        }
    }
}

/// One scored neighbour of the current model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub variable: String,
    pub direction: Direction,
    pub score: f64,
}

/// An accepted move: the step log is an append-only list of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepEntry {
    pub variable: String,
    pub direction: Direction,
    /// Score of the model after the move.
    pub score: f64,
}

/// Everything evaluated during one iteration of the search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationTrace {
    /// Variable set the iteration started from.
    pub current: Vec<String>,
    pub current_score: f64,
    /// Candidates in evaluation order: additions first, then removals.
    pub candidates: Vec<CandidateScore>,
    /// The move taken, if any.
    pub step: Option<StepEntry>,
}

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// No candidate move tied or improved the current score.
    NoImprovement,
    /// Backward search ran out of variables to drop.
    Exhausted,
    /// Forward/stepwise current set equals the full candidate list.
    AlreadyFull,
    /// Stepwise would have moved to a set it already visited.
    CycleDetected,
}

/// Final result of a selection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionOutcome {
    pub strategy: Strategy,
    pub criterion: Criterion,
    pub response: String,
    pub intercept: bool,
    /// Final variable set, in the order it was built.
    pub selected: Vec<String>,
    /// Score of the final model, when at least one iteration ran.
    pub score: Option<f64>,
    pub steps: Vec<StepEntry>,
    pub iterations: Vec<IterationTrace>,
    pub stop_reason: StopReason,
}

/// Resolved settings for one selection run.
#[derive(Debug, Clone)]
pub struct SelectConfig {
    pub strategy: Strategy,
    pub criterion: Criterion,
    pub response: String,
    /// Candidate predictors. `None` means every non-response column, in dataset order.
    pub predictors: Option<Vec<String>>,
    /// Seed set for forward/stepwise. Ignored by backward.
    pub start: Vec<String>,
    pub intercept: bool,
    /// Evaluate the candidates of an iteration on the rayon pool.
    pub parallel: bool,
    /// Stop stepwise search instead of revisiting a variable set.
    pub cycle_guard: bool,
}

impl SelectConfig {
    pub fn new(strategy: Strategy, response: impl Into<String>) -> Self {
        Self {
            strategy,
            criterion: Criterion::Aic,
            response: response.into(),
            predictors: None,
            start: Vec::new(),
            intercept: true,
            parallel: true,
            cycle_guard: true,
        }
    }
}
