//! Model scoring and subset search.
//!
//! Responsibilities:
//!
//! - fit one candidate model and read its criterion (`scorer`)
//! - drive backward / forward / stepwise search over variable sets (`selection`)

pub mod scorer;
pub mod selection;

pub use scorer::*;
pub use selection::*;
