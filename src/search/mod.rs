//! Search orchestration module
//!
//! Resolves the filter policy, selects sites, fans the query out under the
//! configured dispatch strategy and merges what comes back.

mod aggregator;
mod dispatch;
mod models;
pub mod strategies;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::Aggregator;
pub use dispatch::{Dispatcher, SiteOutcome, SiteTask};
pub use models::CallerContext;
pub use strategies::DispatchStrategy;
