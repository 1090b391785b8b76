//! Priority-first dispatch under a hard wall-clock deadline

use super::DispatchStrategy;
use crate::config::SearchSettings;
use crate::results::{AggregateOutcome, SiteErrorKind, SiteFailure};
use crate::search::dispatch::{Dispatcher, SiteTask};
use crate::sites::{PriorityClassifier, Site};
use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

/// Deadline-bounded strategy for short-lived workers
///
/// 1. Up to `priority_limit` priority sites, then normal sites up to
///    `concurrency_cap`, all at once.
/// 2. If fewer than `coverage_threshold` results came back and sites remain,
///    one supplementary wave of the next `supplementary_wave_size` sites.
///
/// Both waves share one deadline, counted from the start of the request.
/// When it fires the strategy returns what it has merged; calls still in
/// flight are detached, not aborted, and their results are dropped.
pub struct DeadlinePriority {
    classifier: Arc<dyn PriorityClassifier>,
    deadline: Duration,
    priority_limit: usize,
    concurrency_cap: usize,
    coverage_threshold: usize,
    supplementary_wave_size: usize,
}

impl DeadlinePriority {
    pub fn new(classifier: Arc<dyn PriorityClassifier>) -> Self {
        Self {
            classifier,
            deadline: Duration::from_millis(9_000),
            priority_limit: 15,
            concurrency_cap: 20,
            coverage_threshold: 100,
            supplementary_wave_size: 15,
        }
    }

    pub fn with_settings(mut self, settings: &SearchSettings) -> Self {
        self.deadline = settings.deadline();
        self.priority_limit = settings.priority_limit;
        self.concurrency_cap = settings.concurrency_cap.max(1);
        self.coverage_threshold = settings.coverage_threshold;
        self.supplementary_wave_size = settings.supplementary_wave_size;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_coverage_threshold(mut self, threshold: usize) -> Self {
        self.coverage_threshold = threshold;
        self
    }

    /// Split into (initial wave, remaining sites in supplementary order)
    fn plan(&self, sites: Vec<Site>) -> (Vec<Site>, Vec<Site>) {
        let (priority, normal) = self.classifier.classify(sites);
        let mut priority = priority.into_iter();
        let mut normal = normal.into_iter();

        let mut initial: Vec<Site> = priority
            .by_ref()
            .take(self.priority_limit.min(self.concurrency_cap))
            .collect();
        let room = self.concurrency_cap.saturating_sub(initial.len());
        initial.extend(normal.by_ref().take(room));

        (initial, priority.chain(normal).collect())
    }
}

#[async_trait]
impl DispatchStrategy for DeadlinePriority {
    fn name(&self) -> &'static str {
        "deadline"
    }

    async fn dispatch(&self, dispatcher: &Dispatcher, sites: Vec<Site>) -> AggregateOutcome {
        let deadline = dispatcher.started() + self.deadline;
        let (initial, remaining) = self.plan(sites);
        let mut outcome = AggregateOutcome::empty();

        debug!(
            "Initial wave: {} sites, {} held back",
            initial.len(),
            remaining.len()
        );
        if !drain_until(dispatcher.spawn_all(initial), deadline, &mut outcome).await {
            return outcome;
        }

        if outcome.result_count() >= self.coverage_threshold || remaining.is_empty() {
            return outcome;
        }
        if Instant::now() >= deadline {
            return outcome;
        }

        info!(
            "Only {} results (< {}), querying {} more sites",
            outcome.result_count(),
            self.coverage_threshold,
            remaining.len().min(self.supplementary_wave_size)
        );
        let supplementary = remaining.into_iter().take(self.supplementary_wave_size);
        drain_until(dispatcher.spawn_all(supplementary), deadline, &mut outcome).await;

        outcome
    }
}

/// Merge settled calls in completion order until all settle or the deadline fires
///
/// Returns false if the deadline fired. Calls still pending at that point are
/// recorded as abandoned and left running.
async fn drain_until(
    tasks: Vec<SiteTask>,
    deadline: Instant,
    outcome: &mut AggregateOutcome,
) -> bool {
    let mut pending_sites: Vec<String> = tasks.iter().map(|t| t.site().to_string()).collect();
    let mut pending: FuturesUnordered<_> = tasks.into_iter().map(SiteTask::settle).collect();

    let drained = timeout_at(deadline, async {
        while let Some(site_outcome) = pending.next().await {
            if let Some(i) = pending_sites.iter().position(|s| *s == site_outcome.site) {
                pending_sites.swap_remove(i);
            }
            site_outcome.merge_into(outcome);
        }
    })
    .await;

    if drained.is_ok() {
        return true;
    }

    warn!(
        "Deadline reached with {} sites still in flight; returning {} results",
        pending_sites.len(),
        outcome.result_count()
    );
    for site in pending_sites {
        outcome.add_failure(SiteFailure::new(
            site,
            SiteErrorKind::Abandoned,
            "still in flight at deadline",
        ));
    }
    false
}
