//! Dispatch every site at once

use super::DispatchStrategy;
use crate::results::AggregateOutcome;
use crate::search::dispatch::{Dispatcher, SiteTask};
use crate::sites::Site;
use async_trait::async_trait;
use futures::future::join_all;
use tracing::debug;

/// All sites concurrently, no batching and no deadline of its own
///
/// Relies on the host's execution limit. Results merge in dispatch order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

#[async_trait]
impl DispatchStrategy for Unbounded {
    fn name(&self) -> &'static str {
        "unbounded"
    }

    async fn dispatch(&self, dispatcher: &Dispatcher, sites: Vec<Site>) -> AggregateOutcome {
        debug!("Dispatching {} sites at once", sites.len());

        let tasks = dispatcher.spawn_all(sites);
        let settled = join_all(tasks.into_iter().map(SiteTask::settle)).await;

        let mut outcome = AggregateOutcome::empty();
        for site_outcome in settled {
            site_outcome.merge_into(&mut outcome);
        }
        outcome
    }
}
