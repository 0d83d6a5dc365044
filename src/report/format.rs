//! Terminal formatting for selection runs.
//!
//! The trace mirrors the classic step-by-step printout:
//!
//! ```text
//! Current model: y ~ intercept + x1 + x2
//!        current      412.37
//! -           x1      530.02
//! -           x2      410.95
//! dropping  x2
//! ```

use crate::data::Dataset;
use crate::domain::{Direction, IterationTrace, SelectionOutcome, StopReason};

/// `response ~ intercept + a + b`.
pub fn format_formula(response: &str, vars: &[String], intercept: bool) -> String {
    let mut terms: Vec<&str> = Vec::with_capacity(vars.len() + 1);
    if intercept {
        terms.push("intercept");
    }
    terms.extend(vars.iter().map(String::as_str));
    if terms.is_empty() {
        return format!("{response} ~ 0");
    }
    format!("{response} ~ {}", terms.join(" + "))
}

/// Full iteration-by-iteration trace, ending with the final model.
pub fn format_trace(outcome: &SelectionOutcome) -> String {
    let mut out = String::new();

    for iteration in &outcome.iterations {
        out.push_str(&format_iteration(iteration, &outcome.response, outcome.intercept));
    }

    match outcome.stop_reason {
        StopReason::CycleDetected => out.push_str("\nstop (variable set already visited)\n"),
        _ => out.push_str("\nstop\n"),
    }
    out.push_str(&format!(
        "\nFinal model: {}\n",
        format_formula(&outcome.response, &outcome.selected, outcome.intercept)
    ));

    out
}

fn format_iteration(iteration: &IterationTrace, response: &str, intercept: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\nCurrent model: {}\n",
        format_formula(response, &iteration.current, intercept)
    ));
    out.push_str(&score_row(' ', "current", iteration.current_score));
    for c in &iteration.candidates {
        out.push_str(&score_row(c.direction.marker(), &c.variable, c.score));
    }
    if let Some(step) = &iteration.step {
        let verb = match step.direction {
            Direction::Add => "adding",
            Direction::Drop => "dropping",
        };
        out.push_str(&format!("{verb}  {}\n", step.variable));
    }
    out
}

fn score_row(marker: char, label: &str, score: f64) -> String {
    format!("{marker}  {:>12}  {:>10.2}\n", truncate(label, 12), score)
}

/// Run header: data shape, settings and the chosen model.
pub fn format_run_summary(
    dataset: &Dataset,
    candidates: &[String],
    outcome: &SelectionOutcome,
) -> String {
    let mut out = String::new();

    out.push_str("=== autoselect - linear model selection ===\n");
    out.push_str(&format!(
        "Strategy: {} | Criterion: {}\n",
        outcome.strategy.display_name(),
        outcome.criterion.display_name()
    ));
    out.push_str(&format!(
        "Data: n={} | columns={} | response={}\n",
        dataset.nrows(),
        dataset.ncols(),
        outcome.response
    ));
    out.push_str(&format!("Candidates: [{}]\n", candidates.join(", ")));

    out.push_str("\nSteps:\n");
    if outcome.steps.is_empty() {
        out.push_str("  (none)\n");
    }
    for (i, step) in outcome.steps.iter().enumerate() {
        out.push_str(&format!(
            "  {:>3}. {} {:<12} {:>10.2}\n",
            i + 1,
            step.direction.marker(),
            truncate(&step.variable, 12),
            step.score
        ));
    }

    out.push_str("\nChosen model:\n");
    out.push_str(&format!(
        "- {}\n",
        format_formula(&outcome.response, &outcome.selected, outcome.intercept)
    ));
    let criterion = outcome.criterion.display_name();
    match outcome.score {
        Some(score) => out.push_str(&format!("- {criterion}: {score:.4}\n")),
        None => out.push_str(&format!("- {criterion}: (not evaluated)\n")),
    }
    out.push_str(&format!("- stop: {}\n", stop_label(outcome.stop_reason)));

    out
}

fn stop_label(reason: StopReason) -> &'static str {
    match reason {
        StopReason::NoImprovement => "no move improves the score",
        StopReason::Exhausted => "no variables left to drop",
        StopReason::AlreadyFull => "every candidate already included",
        StopReason::CycleDetected => "variable set already visited",
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
