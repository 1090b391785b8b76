//! Result types and the aggregate outcome
//!
//! This module defines the records collected from sites and the per-request
//! outcome the aggregator hands back to its caller.

mod outcome;
mod types;

pub use outcome::AggregateOutcome;
pub use types::*;
