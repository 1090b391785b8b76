//! Fixed-size batches processed in bounded waves

use super::DispatchStrategy;
use crate::results::AggregateOutcome;
use crate::search::dispatch::{Dispatcher, SiteTask};
use crate::sites::Site;
use async_trait::async_trait;
use futures::future::join_all;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::debug;

/// Batches of `batch_size` sites, at most `max_concurrent_batches` at a time
///
/// A wave finishes before the next one starts, so no more than
/// `batch_size * max_concurrent_batches` calls are ever in flight. Results
/// merge by wave, then batch, then completion order within the batch.
#[derive(Debug, Clone, Copy)]
pub struct Batched {
    batch_size: usize,
    max_concurrent_batches: usize,
}

impl Batched {
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            max_concurrent_batches: max_concurrent_batches.max(1),
        }
    }

    /// Peak number of concurrent site calls
    pub fn max_in_flight(&self) -> usize {
        self.batch_size * self.max_concurrent_batches
    }
}

impl Default for Batched {
    fn default() -> Self {
        Self::new(25, 3)
    }
}

#[async_trait]
impl DispatchStrategy for Batched {
    fn name(&self) -> &'static str {
        "batched"
    }

    async fn dispatch(&self, dispatcher: &Dispatcher, sites: Vec<Site>) -> AggregateOutcome {
        let batches: Vec<Vec<Site>> = sites
            .chunks(self.batch_size)
            .map(|chunk| chunk.to_vec())
            .collect();

        let mut outcome = AggregateOutcome::empty();
        for (wave_index, wave) in batches.chunks(self.max_concurrent_batches).enumerate() {
            debug!(
                "Wave {}: {} batches, {} sites",
                wave_index + 1,
                wave.len(),
                wave.iter().map(Vec::len).sum::<usize>()
            );

            let settled = join_all(
                wave.iter()
                    .map(|batch| run_batch(dispatcher, batch.clone())),
            )
            .await;

            for batch_outcome in settled {
                outcome.extend(batch_outcome);
            }
        }
        outcome
    }
}

/// Dispatch one batch and merge it in completion order
async fn run_batch(dispatcher: &Dispatcher, batch: Vec<Site>) -> AggregateOutcome {
    let mut pending: FuturesUnordered<_> = dispatcher
        .spawn_all(batch)
        .into_iter()
        .map(SiteTask::settle)
        .collect();

    let mut outcome = AggregateOutcome::empty();
    while let Some(site_outcome) = pending.next().await {
        site_outcome.merge_into(&mut outcome);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::testing::{numbered_sites, records, sites, Behavior, MockClient};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_130_sites_each_dispatched_once() {
        let client = Arc::new(
            MockClient::new().with_default(Behavior::results(2).after(Duration::from_millis(20))),
        );
        let dispatcher = Dispatcher::new(client.clone(), "q");
        let sites = numbered_sites("site", 130);

        let outcome = Batched::default().dispatch(&dispatcher, sites.clone()).await;

        let calls = client.calls();
        assert_eq!(calls.len(), 130);
        let unique: HashSet<_> = calls.iter().collect();
        assert_eq!(unique.len(), 130);

        assert_eq!(outcome.result_count(), 260);
        let expected: HashSet<String> = sites
            .iter()
            .flat_map(|s| records(&s.name, 2))
            .map(|r| r.as_value().to_string())
            .collect();
        let got: HashSet<String> = outcome
            .results
            .iter()
            .map(|r| r.as_value().to_string())
            .collect();
        assert_eq!(got, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_peak_concurrency_is_capped() {
        let client = Arc::new(
            MockClient::new().with_default(Behavior::results(1).after(Duration::from_millis(50))),
        );
        let dispatcher = Dispatcher::new(client.clone(), "q");
        let strategy = Batched::default();

        strategy
            .dispatch(&dispatcher, numbered_sites("site", 200))
            .await;

        assert_eq!(strategy.max_in_flight(), 75);
        assert_eq!(client.max_in_flight(), 75);
        assert_eq!(client.calls().len(), 200);
    }

    #[tokio::test(start_paused = true)]
    async fn test_merge_order_wave_then_batch() {
        // batch size 1, one batch per wave: strictly sequential
        let client = MockClient::new()
            .with("a", Behavior::results(1).after(Duration::from_millis(40)))
            .with("b", Behavior::results(1))
            .with("c", Behavior::results(1).after(Duration::from_millis(10)));
        let dispatcher = Dispatcher::new(Arc::new(client), "q");

        let outcome = Batched::new(1, 1)
            .dispatch(&dispatcher, sites(&["a", "b", "c"]))
            .await;

        let mut expected = records("a", 1);
        expected.extend(records("b", 1));
        expected.extend(records("c", 1));
        assert_eq!(outcome.results, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_order_within_batch() {
        let client = MockClient::new()
            .with("slow", Behavior::results(1).after(Duration::from_millis(40)))
            .with("fast", Behavior::results(1).after(Duration::from_millis(5)));
        let dispatcher = Dispatcher::new(Arc::new(client), "q");

        let outcome = Batched::new(25, 3)
            .dispatch(&dispatcher, sites(&["slow", "fast"]))
            .await;

        let mut expected = records("fast", 1);
        expected.extend(records("slow", 1));
        assert_eq!(outcome.results, expected);
    }

    #[tokio::test]
    async fn test_failures_isolated_across_batches() {
        let client = MockClient::new()
            .with_default(Behavior::results(1))
            .with("site3", Behavior::fail())
            .with("site7", Behavior::panic());
        let dispatcher = Dispatcher::new(Arc::new(client), "q");

        let outcome = Batched::new(2, 2)
            .dispatch(&dispatcher, numbered_sites("site", 10))
            .await;

        assert_eq!(outcome.result_count(), 8);
        assert_eq!(outcome.error_sites.len(), 2);
        assert!(!outcome.errored);
    }
}
