//! Reporting: human-readable traces and run summaries.
//!
//! Formatting lives here so the search code stays free of presentation concerns.

pub mod format;

pub use format::*;
