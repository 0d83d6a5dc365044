//! Greedy variable selection (backward / forward / stepwise).
//!
//! Each iteration:
//! 1. scores the current model
//! 2. scores every neighbour (one variable added or dropped)
//! 3. moves to the best neighbour if it ties or beats the current score
//!
//! Neighbours are reduced left to right with `<=`, so among equal scores the
//! last one in evaluation order wins. Stepwise evaluates both directions and
//! prefers a drop over an add.
//!
//! The search is an explicit loop over `SearchState` values. Every iteration is a
//! pure function of the state, so a run can be resumed from any intermediate set
//! with `run_from`.

use std::collections::{BTreeSet, HashSet};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::data::Dataset;
use crate::domain::{
    CandidateScore, Direction, IterationTrace, SelectConfig, SelectionOutcome, StepEntry,
    StopReason, Strategy,
};
use crate::error::SelectError;
use crate::fit::scorer::{OlsScorer, Scorer};

/// State carried between iterations.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub current: Vec<String>,
    /// Score of `current`, once it has been evaluated.
    pub score: Option<f64>,
}

impl SearchState {
    pub fn new(seed: Vec<String>) -> Self {
        Self {
            current: seed,
            score: None,
        }
    }

    /// State after applying `step`. Does not touch `self`.
    pub fn advance(&self, step: &StepEntry) -> Self {
        let current = match step.direction {
            Direction::Add => {
                let mut next = self.current.clone();
                next.push(step.variable.clone());
                next
            }
            Direction::Drop => self
                .current
                .iter()
                .filter(|v| **v != step.variable)
                .cloned()
                .collect(),
        };
        Self {
            current,
            score: Some(step.score),
        }
    }
}

/// Result of a single iteration.
#[derive(Debug, Clone, PartialEq)]
pub enum Iteration {
    /// Terminal. `trace` is `None` when the stop was decided without fitting.
    Stop {
        reason: StopReason,
        trace: Option<IterationTrace>,
    },
    Move {
        trace: IterationTrace,
        next: SearchState,
    },
}

/// Score-driven subset search over a fixed dataset.
pub struct Selector<'a, S: Scorer = OlsScorer> {
    dataset: &'a Dataset,
    response: &'a [f64],
    candidates: Vec<String>,
    config: SelectConfig,
    scorer: S,
}

impl<'a> Selector<'a, OlsScorer> {
    pub fn new(dataset: &'a Dataset, config: SelectConfig) -> Result<Self, SelectError> {
        Self::with_scorer(dataset, config, OlsScorer)
    }
}

impl<'a, S: Scorer> Selector<'a, S> {
    /// Validate names against the dataset and build a selector.
    ///
    /// Every name is resolved here, so a missing column fails before any fit.
    pub fn with_scorer(
        dataset: &'a Dataset,
        config: SelectConfig,
        scorer: S,
    ) -> Result<Self, SelectError> {
        let response = dataset.column(&config.response)?;
        if dataset.nrows() == 0 {
            return Err(SelectError::EmptyDataset);
        }

        let candidates: Vec<String> = match &config.predictors {
            Some(list) => list.clone(),
            None => dataset
                .names()
                .iter()
                .filter(|n| **n != config.response)
                .cloned()
                .collect(),
        };

        let mut seen = HashSet::new();
        for name in &candidates {
            dataset.column(name)?;
            if *name == config.response {
                return Err(SelectError::ResponseAsPredictor { name: name.clone() });
            }
            if !seen.insert(name.as_str()) {
                return Err(SelectError::DuplicateVariable { name: name.clone() });
            }
        }

        let selector = Self {
            dataset,
            response,
            candidates,
            config,
            scorer,
        };
        selector.validate_subset(&selector.config.start)?;
        Ok(selector)
    }

    /// Full candidate list, in the order moves are evaluated.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Run from the strategy's default starting set: every candidate for backward,
    /// the configured seed otherwise.
    pub fn run(&self) -> Result<SelectionOutcome, SelectError> {
        let seed = match self.config.strategy {
            Strategy::Backward => self.candidates.clone(),
            Strategy::Forward | Strategy::Stepwise => self.config.start.clone(),
        };
        self.run_from(seed)
    }

    /// Run from an explicit starting set.
    pub fn run_from(&self, seed: Vec<String>) -> Result<SelectionOutcome, SelectError> {
        self.validate_subset(&seed)?;

        let strategy = self.config.strategy;
        info!(
            strategy = strategy.display_name(),
            response = %self.config.response,
            candidates = self.candidates.len(),
            seed = ?seed,
            "starting selection"
        );

        let mut state = SearchState::new(seed);
        let mut visited: HashSet<BTreeSet<String>> = HashSet::new();
        visited.insert(set_key(&state.current));

        let mut steps = Vec::new();
        let mut iterations = Vec::new();

        let stop_reason = loop {
            match self.step(&state)? {
                Iteration::Stop { reason, trace } => {
                    if let Some(trace) = trace {
                        state.score = Some(trace.current_score);
                        iterations.push(trace);
                    }
                    break reason;
                }
                Iteration::Move { mut trace, next } => {
                    if self.config.cycle_guard && !visited.insert(set_key(&next.current)) {
                        warn!(
                            set = ?next.current,
                            "variable set already visited; stopping to avoid a cycle"
                        );
                        state.score = Some(trace.current_score);
                        trace.step = None;
                        iterations.push(trace);
                        break StopReason::CycleDetected;
                    }

                    if let Some(step) = &trace.step {
                        info!(
                            variable = %step.variable,
                            direction = ?step.direction,
                            score = step.score,
                            "accepted move"
                        );
                        steps.push(step.clone());
                    }
                    iterations.push(trace);
                    state = next;
                }
            }
        };

        info!(
            selected = ?state.current,
            score = ?state.score,
            reason = ?stop_reason,
            "selection stopped"
        );

        Ok(SelectionOutcome {
            strategy,
            criterion: self.config.criterion,
            response: self.config.response.clone(),
            intercept: self.config.intercept,
            selected: state.current,
            score: state.score,
            steps,
            iterations,
            stop_reason,
        })
    }

    /// Evaluate one iteration from `state`.
    pub fn step(&self, state: &SearchState) -> Result<Iteration, SelectError> {
        let strategy = self.config.strategy;
        let current = &state.current;

        match strategy {
            Strategy::Backward if current.is_empty() => {
                return Ok(Iteration::Stop {
                    reason: StopReason::Exhausted,
                    trace: None,
                });
            }
            Strategy::Forward | Strategy::Stepwise if *current == self.candidates => {
                return Ok(Iteration::Stop {
                    reason: StopReason::AlreadyFull,
                    trace: None,
                });
            }
            _ => {}
        }

        let current_score = self.score(current)?;

        let additions = match strategy {
            Strategy::Forward | Strategy::Stepwise => self.score_moves(current, Direction::Add)?,
            Strategy::Backward => Vec::new(),
        };
        let removals = match strategy {
            Strategy::Backward | Strategy::Stepwise => self.score_moves(current, Direction::Drop)?,
            Strategy::Forward => Vec::new(),
        };

        let best_add = best_move(current_score, &additions);
        let best_drop = best_move(current_score, &removals);
        let chosen = match strategy {
            Strategy::Backward => best_drop,
            Strategy::Forward => best_add,
            Strategy::Stepwise => best_drop.or(best_add),
        };
        let step = chosen.map(|c| StepEntry {
            variable: c.variable.clone(),
            direction: c.direction,
            score: c.score,
        });

        let mut candidates = additions;
        candidates.extend(removals);
        let trace = IterationTrace {
            current: current.clone(),
            current_score,
            candidates,
            step: step.clone(),
        };

        Ok(match step {
            Some(step) => Iteration::Move {
                next: state.advance(&step),
                trace,
            },
            None => Iteration::Stop {
                reason: StopReason::NoImprovement,
                trace: Some(trace),
            },
        })
    }

    /// Criterion value of the model `response ~ [intercept +] vars`.
    pub fn score(&self, vars: &[String]) -> Result<f64, SelectError> {
        let columns = self.dataset.columns(vars)?;
        let fit = self.scorer.fit(self.response, &columns, self.config.intercept)?;
        let score = self.config.criterion.score(&fit);
        if !score.is_finite() {
            return Err(SelectError::NonFiniteScore {
                predictors: vars.join(", "),
            });
        }
        debug!(vars = ?vars, score, "scored model");
        Ok(score)
    }

    fn score_moves(
        &self,
        current: &[String],
        direction: Direction,
    ) -> Result<Vec<CandidateScore>, SelectError> {
        let moves: Vec<(String, Vec<String>)> = match direction {
            Direction::Add => self
                .candidates
                .iter()
                .filter(|c| !current.contains(c))
                .map(|c| {
                    let mut next = current.to_vec();
                    next.push(c.clone());
                    (c.clone(), next)
                })
                .collect(),
            Direction::Drop => current
                .iter()
                .map(|c| {
                    let next = current.iter().filter(|v| *v != c).cloned().collect();
                    (c.clone(), next)
                })
                .collect(),
        };

        let eval = |(variable, vars): &(String, Vec<String>)| {
            self.score(vars).map(|score| CandidateScore {
                variable: variable.clone(),
                direction,
                score,
            })
        };

        // Collect per-candidate results in order first so the reported error
        // (if any) is the first failing candidate regardless of scheduling.
        let results: Vec<Result<CandidateScore, SelectError>> = if self.config.parallel {
            moves.par_iter().map(eval).collect()
        } else {
            moves.iter().map(eval).collect()
        };
        results.into_iter().collect()
    }

    fn validate_subset(&self, set: &[String]) -> Result<(), SelectError> {
        let mut seen = HashSet::new();
        for name in set {
            if !self.candidates.contains(name) {
                self.dataset.column(name)?;
                return Err(SelectError::NotACandidate { name: name.clone() });
            }
            if !seen.insert(name.as_str()) {
                return Err(SelectError::DuplicateVariable { name: name.clone() });
            }
        }
        Ok(())
    }
}

/// Left-to-right `<=` scan starting from the current score.
///
/// Returns the last move achieving the minimum, provided that minimum ties or
/// beats `current_score`.
fn best_move(current_score: f64, moves: &[CandidateScore]) -> Option<&CandidateScore> {
    let mut best_score = current_score;
    let mut best = None;
    for m in moves {
        if m.score <= best_score {
            best_score = m.score;
            best = Some(m);
        }
    }
    best
}

fn set_key(vars: &[String]) -> BTreeSet<String> {
    vars.iter().cloned().collect()
}

/// Backward elimination from every candidate.
pub fn backward_selection(
    dataset: &Dataset,
    response: &str,
    predictors: &[String],
) -> Result<SelectionOutcome, SelectError> {
    let mut config = SelectConfig::new(Strategy::Backward, response);
    config.predictors = Some(predictors.to_vec());
    Selector::new(dataset, config)?.run()
}

/// Forward selection from `start` (empty when `None`).
pub fn forward_selection(
    dataset: &Dataset,
    response: &str,
    predictors: &[String],
    start: Option<&[String]>,
) -> Result<SelectionOutcome, SelectError> {
    let mut config = SelectConfig::new(Strategy::Forward, response);
    config.predictors = Some(predictors.to_vec());
    config.start = start.map(<[String]>::to_vec).unwrap_or_default();
    Selector::new(dataset, config)?.run()
}

/// Bidirectional stepwise search from `start` (empty when `None`).
pub fn stepwise_selection(
    dataset: &Dataset,
    response: &str,
    predictors: &[String],
    start: Option<&[String]>,
) -> Result<SelectionOutcome, SelectError> {
    let mut config = SelectConfig::new(Strategy::Stepwise, response);
    config.predictors = Some(predictors.to_vec());
    config.start = start.map(<[String]>::to_vec).unwrap_or_default();
    Selector::new(dataset, config)?.run()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::data::{SampleConfig, generate_sample};
    use crate::math::OlsFit;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    /// Scorer that looks the AIC up by variable set.
    ///
    /// Columns are identified by their first value (column `xk` starts with `k`),
    /// so the table is keyed by the sorted list of those tags.
    struct TableScorer {
        table: HashMap<Vec<u32>, f64>,
    }

    impl TableScorer {
        fn new(entries: Vec<(Vec<u32>, f64)>) -> Self {
            let table = entries
                .into_iter()
                .map(|(mut k, v)| {
                    k.sort_unstable();
                    (k, v)
                })
                .collect();
            Self { table }
        }
    }

    impl Scorer for TableScorer {
        fn fit(
            &self,
            _y: &[f64],
            columns: &[&[f64]],
            _add_intercept: bool,
        ) -> Result<OlsFit, SelectError> {
            let mut key: Vec<u32> = columns.iter().map(|c| c[0] as u32).collect();
            key.sort_unstable();
            let aic = *self.table.get(&key).ok_or(SelectError::SingularFit {
                columns: columns.len(),
                rank: 0,
                nobs: 0,
            })?;
            Ok(OlsFit {
                params: Vec::new(),
                ssr: 0.0,
                nobs: 0,
                n_params: columns.len(),
                llf: 0.0,
                aic,
                bic: aic,
            })
        }
    }

    fn tagged_dataset(k: usize) -> Dataset {
        let mut cols = vec![("y".to_string(), vec![0.0; 4])];
        for i in 1..=k {
            cols.push((format!("x{i}"), vec![i as f64; 4]));
        }
        Dataset::from_columns(cols).unwrap()
    }

    fn config(strategy: Strategy) -> SelectConfig {
        let mut c = SelectConfig::new(strategy, "y");
        c.parallel = false;
        c
    }

    #[test]
    fn backward_tie_picks_later_variable() {
        let ds = tagged_dataset(3);
        let scorer = TableScorer::new(vec![
            (vec![1, 2, 3], 10.0),
            (vec![2, 3], 12.0),
            (vec![1, 3], 9.0),
            (vec![1, 2], 9.0),
            // After dropping x3, dropping anything is worse.
            (vec![1], 11.0),
            (vec![2], 11.0),
        ]);
        let out = Selector::with_scorer(&ds, config(Strategy::Backward), scorer)
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(out.steps.len(), 1);
        assert_eq!(out.steps[0].variable, "x3");
        assert_eq!(out.selected, names(&["x1", "x2"]));
        assert_eq!(out.stop_reason, StopReason::NoImprovement);
        assert_eq!(out.score, Some(9.0));
    }

    #[test]
    fn forward_tie_picks_later_variable() {
        let ds = tagged_dataset(3);
        let scorer = TableScorer::new(vec![
            (vec![], 20.0),
            (vec![1], 15.0),
            (vec![2], 18.0),
            (vec![3], 15.0),
            (vec![1, 3], 16.0),
            (vec![2, 3], 16.0),
        ]);
        let out = Selector::with_scorer(&ds, config(Strategy::Forward), scorer)
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(out.selected, names(&["x3"]));
        assert_eq!(out.steps[0].direction, Direction::Add);
    }

    #[test]
    fn equal_score_move_is_accepted() {
        let ds = tagged_dataset(1);
        let scorer = TableScorer::new(vec![(vec![1], 5.0), (vec![], 5.0)]);
        let out = Selector::with_scorer(&ds, config(Strategy::Backward), scorer)
            .unwrap()
            .run()
            .unwrap();
        assert!(out.selected.is_empty());
        assert_eq!(out.stop_reason, StopReason::Exhausted);
        assert_eq!(out.score, Some(5.0));
    }

    #[test]
    fn stepwise_prefers_drop_over_better_add() {
        let ds = tagged_dataset(3);
        let scorer = TableScorer::new(vec![
            (vec![1, 2], 10.0),
            // add x3 is the best move overall...
            (vec![1, 2, 3], 5.0),
            // ...but dropping x1 also improves, and drops win.
            (vec![2], 9.0),
            (vec![1], 11.0),
            // next round from [x2]
            (vec![2, 3], 9.5),
            (vec![], 12.0),
        ]);
        let mut c = config(Strategy::Stepwise);
        c.start = names(&["x1", "x2"]);
        let out = Selector::with_scorer(&ds, c, scorer).unwrap().run().unwrap();

        assert_eq!(out.steps[0].variable, "x1");
        assert_eq!(out.steps[0].direction, Direction::Drop);
        assert_eq!(out.selected, names(&["x2"]));
        assert_eq!(out.stop_reason, StopReason::NoImprovement);
    }

    #[test]
    fn stepwise_cycle_guard_stops_oscillation() {
        // Every set of size <= 1 scores the same, so add and drop always tie.
        let ds = tagged_dataset(2);
        let scorer = TableScorer::new(vec![
            (vec![], 1.0),
            (vec![1], 1.0),
            (vec![2], 1.0),
            (vec![1, 2], 3.0),
        ]);
        let out = Selector::with_scorer(&ds, config(Strategy::Stepwise), scorer)
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(out.stop_reason, StopReason::CycleDetected);
        assert_eq!(out.selected, names(&["x2"]));
        assert!(out.iterations.last().unwrap().step.is_none());
    }

    #[test]
    fn trivial_inputs_stop_without_fitting() {
        let ds = tagged_dataset(2);
        // Empty table: any fit would fail.
        let scorer = TableScorer::new(vec![]);
        let mut c = config(Strategy::Backward);
        c.predictors = Some(Vec::new());
        let out = Selector::with_scorer(&ds, c, scorer).unwrap().run().unwrap();
        assert!(out.selected.is_empty());
        assert!(out.iterations.is_empty());
        assert_eq!(out.stop_reason, StopReason::Exhausted);

        for strategy in [Strategy::Forward, Strategy::Stepwise] {
            let mut c = config(strategy);
            c.start = names(&["x1", "x2"]);
            let out = Selector::with_scorer(&ds, c, TableScorer::new(vec![]))
                .unwrap()
                .run()
                .unwrap();
            assert_eq!(out.selected, names(&["x1", "x2"]));
            assert_eq!(out.stop_reason, StopReason::AlreadyFull);
            assert_eq!(out.score, None);
        }
    }

    #[test]
    fn singular_fit_aborts_the_search() {
        let ds = tagged_dataset(2);
        let scorer = TableScorer::new(vec![(vec![1, 2], 3.0), (vec![2], 2.0)]);
        let err = Selector::with_scorer(&ds, config(Strategy::Backward), scorer)
            .unwrap()
            .run()
            .unwrap_err();
        assert!(matches!(err, SelectError::SingularFit { .. }));
    }

    #[test]
    fn non_finite_score_aborts_the_search() {
        let ds = tagged_dataset(2);
        let scorer = TableScorer::new(vec![(vec![1, 2], 3.0), (vec![2], 2.0), (vec![1], f64::NAN)]);
        let err = Selector::with_scorer(&ds, config(Strategy::Backward), scorer)
            .unwrap()
            .run()
            .unwrap_err();
        assert_eq!(
            err,
            SelectError::NonFiniteScore {
                predictors: "x1".to_string()
            }
        );
    }

    #[test]
    fn unknown_names_fail_before_fitting() {
        let ds = tagged_dataset(2);
        let mut c = config(Strategy::Forward);
        c.predictors = Some(names(&["x1", "nope"]));
        let err = Selector::with_scorer(&ds, c, TableScorer::new(vec![])).err().unwrap();
        assert_eq!(err, SelectError::ColumnNotFound { name: "nope".to_string() });

        let c = SelectConfig::new(Strategy::Forward, "target");
        let err = Selector::new(&ds, c).err().unwrap();
        assert_eq!(err, SelectError::ColumnNotFound { name: "target".to_string() });
    }

    #[test]
    fn seed_must_be_a_unique_subset() {
        let ds = tagged_dataset(3);
        let mut c = config(Strategy::Forward);
        c.predictors = Some(names(&["x1", "x2"]));
        c.start = names(&["x3"]);
        assert!(matches!(
            Selector::new(&ds, c).err().unwrap(),
            SelectError::NotACandidate { .. }
        ));

        let mut c = config(Strategy::Forward);
        c.start = names(&["x1", "x1"]);
        assert!(matches!(
            Selector::new(&ds, c).err().unwrap(),
            SelectError::DuplicateVariable { .. }
        ));
    }

    #[test]
    fn response_is_never_a_candidate() {
        let ds = tagged_dataset(2);
        let sel = Selector::new(&ds, config(Strategy::Forward)).unwrap();
        assert_eq!(sel.candidates(), &names(&["x1", "x2"])[..]);

        let mut c = config(Strategy::Forward);
        c.predictors = Some(names(&["x1", "y"]));
        assert!(matches!(
            Selector::new(&ds, c).err().unwrap(),
            SelectError::ResponseAsPredictor { .. }
        ));
    }

    #[test]
    fn run_from_intermediate_state_matches_tail_of_full_run() {
        let ds = generate_sample(&SampleConfig {
            rows: 300,
            noise_predictors: 4,
            seed: 7,
            ..SampleConfig::default()
        })
        .unwrap();
        let sel = Selector::new(&ds, config(Strategy::Backward)).unwrap();
        let full = sel.run().unwrap();
        assert!(full.iterations.len() >= 2);

        let resumed = sel.run_from(full.iterations[1].current.clone()).unwrap();
        assert_eq!(resumed.selected, full.selected);
        assert_eq!(resumed.steps[..], full.steps[1..]);
    }

    #[test]
    fn parallel_and_sequential_runs_agree() {
        let ds = generate_sample(&SampleConfig {
            rows: 120,
            noise_predictors: 5,
            seed: 3,
            ..SampleConfig::default()
        })
        .unwrap();
        let mut seq = config(Strategy::Stepwise);
        seq.parallel = false;
        let mut par = config(Strategy::Stepwise);
        par.parallel = true;

        let a = Selector::new(&ds, seq).unwrap().run().unwrap();
        let b = Selector::new(&ds, par).unwrap().run().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn advance_does_not_mutate_previous_state() {
        let state = SearchState::new(names(&["a", "b"]));
        let next = state.advance(&StepEntry {
            variable: "a".to_string(),
            direction: Direction::Drop,
            score: 1.0,
        });
        assert_eq!(state.current, names(&["a", "b"]));
        assert_eq!(next.current, names(&["b"]));
        assert_eq!(next.score, Some(1.0));
    }
}
