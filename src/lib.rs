//! fanout-search: concurrent search aggregation across many third-party sites
//!
//! A query is fanned out to every eligible site under one of three dispatch
//! strategies (unbounded, batched, or deadline-bounded with priority sites
//! first). Per-site failures are isolated; only a site directory failure
//! fails the request.

pub mod config;
pub mod network;
pub mod preferences;
pub mod results;
pub mod search;
pub mod sites;
pub mod web;

pub use config::Settings;
pub use results::{AggregateOutcome, SearchResult};
pub use search::{Aggregator, CallerContext};
pub use sites::Site;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
