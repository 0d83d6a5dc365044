//! Synthetic regression samples.
//!
//! Generates `y = b0 + b1 * x1 + ε` together with `noise_predictors` extra columns
//! that carry no signal. Handy for demos and for checking that a selection run
//! recovers the signal column.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::Dataset;
use crate::error::AppError;

/// Knobs for the synthetic generator.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub rows: usize,
    pub seed: u64,
    pub intercept: f64,
    pub slope: f64,
    /// Standard deviation of the additive noise on `y`.
    pub noise_sd: f64,
    /// Number of pure-noise predictors (`x2`, `x3`, ...).
    pub noise_predictors: usize,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            rows: 200,
            seed: 42,
            intercept: 1.0,
            slope: 2.0,
            noise_sd: 1.0,
            noise_predictors: 2,
        }
    }
}

/// Generate a dataset with columns `y, x1, x2, ...`.
pub fn generate_sample(config: &SampleConfig) -> Result<Dataset, AppError> {
    if config.rows == 0 {
        return Err(AppError::new(2, "Sample rows must be > 0."));
    }
    if !(config.noise_sd.is_finite() && config.noise_sd > 0.0) {
        return Err(AppError::new(2, "Noise standard deviation must be positive."));
    }
    if !(config.intercept.is_finite() && config.slope.is_finite()) {
        return Err(AppError::new(2, "Invalid sample coefficients."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let unit = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Predictor distribution error: {e}")))?;
    let noise = Normal::new(0.0, config.noise_sd)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let k = config.noise_predictors + 1;
    let mut xs: Vec<Vec<f64>> = vec![Vec::with_capacity(config.rows); k];
    let mut y = Vec::with_capacity(config.rows);

    for _ in 0..config.rows {
        let row: Vec<f64> = (0..k).map(|_| unit.sample(&mut rng)).collect();
        y.push(config.intercept + config.slope * row[0] + noise.sample(&mut rng));
        for (col, v) in xs.iter_mut().zip(row) {
            col.push(v);
        }
    }

    let mut columns = Vec::with_capacity(k + 1);
    columns.push(("y".to_string(), y));
    for (i, col) in xs.into_iter().enumerate() {
        columns.push((format!("x{}", i + 1), col));
    }

    Ok(Dataset::from_columns(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_has_expected_shape() {
        let ds = generate_sample(&SampleConfig {
            rows: 50,
            noise_predictors: 3,
            ..SampleConfig::default()
        })
        .unwrap();
        assert_eq!(ds.nrows(), 50);
        assert_eq!(ds.names(), &["y", "x1", "x2", "x3", "x4"]);
    }

    #[test]
    fn same_seed_same_sample() {
        let config = SampleConfig::default();
        let a = generate_sample(&config).unwrap();
        let b = generate_sample(&config).unwrap();
        assert_eq!(a.column("y").unwrap(), b.column("y").unwrap());
    }

    #[test]
    fn zero_rows_is_rejected() {
        let err = generate_sample(&SampleConfig {
            rows: 0,
            ..SampleConfig::default()
        })
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
