//! Guarded per-site dispatch
//!
//! Every site call runs in its own task. Whatever happens inside it (an error,
//! a panic, a cancelled task) becomes a [`SiteFailure`] for that site alone.

use crate::network::SearchClient;
use crate::results::{AggregateOutcome, SearchResult, SiteErrorKind, SiteFailure};
use crate::sites::Site;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

/// What one site call settled to
#[derive(Debug)]
pub struct SiteOutcome {
    pub site: String,
    pub elapsed: Duration,
    pub result: Result<Vec<SearchResult>, SiteFailure>,
}

impl SiteOutcome {
    fn failed(site: String, kind: SiteErrorKind, message: String) -> Self {
        let failure = SiteFailure::new(site.clone(), kind, message);
        Self {
            site,
            elapsed: Duration::ZERO,
            result: Err(failure),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Append into an outcome on the orchestrating task
    pub fn merge_into(self, outcome: &mut AggregateOutcome) {
        match self.result {
            Ok(results) => {
                outcome.add_success(&self.site, results, self.elapsed.as_millis() as u64)
            }
            Err(failure) => outcome.add_failure(failure),
        }
    }
}

/// Spawns site calls for one query
#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<dyn SearchClient>,
    query: Arc<str>,
    started: Instant,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn SearchClient>, query: &str) -> Self {
        Self {
            client,
            query: Arc::from(query),
            started: Instant::now(),
        }
    }

    /// Backdate the request start, so budgets include work done before dispatch
    pub fn started_at(mut self, started: Instant) -> Self {
        self.started = started;
        self
    }

    /// When the request began
    pub fn started(&self) -> Instant {
        self.started
    }

    /// Start a site call immediately; it runs whether or not it is awaited
    pub fn spawn(&self, site: Site) -> SiteTask {
        let name = site.name.clone();
        let client = Arc::clone(&self.client);
        let query = Arc::clone(&self.query);
        let handle = tokio::spawn(async move { search_site(client, site, query).await });
        SiteTask { site: name, handle }
    }

    pub fn spawn_all(&self, sites: impl IntoIterator<Item = Site>) -> Vec<SiteTask> {
        sites.into_iter().map(|s| self.spawn(s)).collect()
    }
}

/// Handle to an in-flight site call
///
/// Dropping it detaches the call; it keeps running but its result is discarded.
pub struct SiteTask {
    site: String,
    handle: JoinHandle<SiteOutcome>,
}

impl SiteTask {
    pub fn site(&self) -> &str {
        &self.site
    }

    /// Wait for the call to settle
    pub async fn settle(self) -> SiteOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Search task for {} did not complete: {}", self.site, e);
                SiteOutcome::failed(self.site, SiteErrorKind::Panicked, e.to_string())
            }
        }
    }
}

async fn search_site(client: Arc<dyn SearchClient>, site: Site, query: Arc<str>) -> SiteOutcome {
    let start = Instant::now();
    let result = client.search(&site, &query).await;
    let elapsed = start.elapsed();

    let result = match result {
        Ok(results) => {
            debug!(
                "Site {} returned {} results in {:?}",
                site.name,
                results.len(),
                elapsed
            );
            Ok(results)
        }
        Err(e) => {
            warn!("Site {} failed after {:?}: {}", site.name, elapsed, e);
            Err(SiteFailure::new(site.name.clone(), e.kind(), e.to_string()))
        }
    };

    SiteOutcome {
        site: site.name,
        elapsed,
        result,
    }
}
