//! Mathematical utilities: least squares and likelihood-based criteria.

pub mod ols;

pub use ols::*;
