//! Dispatch strategies
//!
//! One trait, three implementations. The deployment picks one through
//! `search.strategy`; the aggregator never branches on it.

mod batched;
mod deadline;
mod unbounded;

pub use batched::Batched;
pub use deadline::DeadlinePriority;
pub use unbounded::Unbounded;

use super::dispatch::Dispatcher;
use crate::config::{SearchSettings, StrategyKind};
use crate::results::AggregateOutcome;
use crate::sites::{MarkerClassifier, Site};
use async_trait::async_trait;
use std::sync::Arc;

/// Fans one query out over a site set
///
/// Implementations never fail: per-site failures are recorded in the
/// returned outcome and contribute no results.
#[async_trait]
pub trait DispatchStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn dispatch(&self, dispatcher: &Dispatcher, sites: Vec<Site>) -> AggregateOutcome;
}

/// Build the configured strategy
pub fn from_settings(settings: &SearchSettings) -> Arc<dyn DispatchStrategy> {
    match settings.strategy {
        StrategyKind::Unbounded => Arc::new(Unbounded),
        StrategyKind::Batched => Arc::new(Batched::new(
            settings.batch_size,
            settings.max_concurrent_batches,
        )),
        StrategyKind::Deadline => Arc::new(
            DeadlinePriority::new(Arc::new(MarkerClassifier::new(
                settings.priority_markers.clone(),
            )))
            .with_settings(settings),
        ),
    }
}
