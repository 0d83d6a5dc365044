//! Input/output helpers.
//!
//! - CSV ingest into a `Dataset` (`ingest`)
//! - JSON report read/write (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
