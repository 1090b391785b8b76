//! HTTP networking module
//!
//! Provides the single-site search client used by every dispatch strategy.

mod client;
mod traits;

pub use client::{extract_results, HttpSearchClient};
pub use traits::{SearchClient, SearchError};
