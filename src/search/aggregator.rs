//! Aggregation engine: policy, site selection and dispatch for one query

use super::dispatch::Dispatcher;
use super::models::CallerContext;
use super::strategies::{self, DispatchStrategy};
use crate::config::SearchSettings;
use crate::network::SearchClient;
use crate::preferences::{FilterPolicyResolver, PreferenceStore};
use crate::results::AggregateOutcome;
use crate::sites::{SiteDirectory, SiteSelector};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

/// Orchestrates one search request end to end
///
/// Only a site directory failure makes the outcome `errored`; per-site
/// failures and deadline expiry degrade to partial or empty results.
#[derive(Clone)]
pub struct Aggregator {
    resolver: FilterPolicyResolver,
    selector: SiteSelector,
    client: Arc<dyn SearchClient>,
    strategy: Arc<dyn DispatchStrategy>,
}

impl Aggregator {
    pub fn new(
        resolver: FilterPolicyResolver,
        selector: SiteSelector,
        client: Arc<dyn SearchClient>,
        strategy: Arc<dyn DispatchStrategy>,
    ) -> Self {
        Self {
            resolver,
            selector,
            client,
            strategy,
        }
    }

    /// Wire the collaborators with the strategy chosen in settings
    pub fn from_settings(
        settings: &SearchSettings,
        directory: Arc<dyn SiteDirectory>,
        store: Arc<dyn PreferenceStore>,
        client: Arc<dyn SearchClient>,
    ) -> Self {
        Self::new(
            FilterPolicyResolver::new(store).with_timeout(settings.preference_timeout()),
            SiteSelector::new(directory),
            client,
            strategies::from_settings(settings),
        )
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Search every eligible site for `query`
    ///
    /// A blank query contacts no site. Any other query is sent to sites as given.
    pub async fn aggregate(&self, query: Option<&str>, ctx: &CallerContext) -> AggregateOutcome {
        let start = Instant::now();
        let query = match query {
            Some(q) if !q.trim().is_empty() => q,
            _ => {
                debug!("Empty query, nothing to search");
                return AggregateOutcome::empty();
            }
        };

        let span = info_span!(
            "aggregate",
            request_id = %Uuid::new_v4(),
            strategy = self.strategy.name(),
            query = %query,
        );
        self.run(query, ctx, start).instrument(span).await
    }

    async fn run(&self, query: &str, ctx: &CallerContext, start: Instant) -> AggregateOutcome {
        let policy = self.resolver.resolve(ctx.user_id(), ctx.include_adult).await;
        debug!("Filter adult content: {}", policy.filter_adult);

        let sites = match self.selector.select(policy.filter_adult).await {
            Ok(sites) => sites,
            Err(e) => {
                error!("Site directory failed: {}", e);
                return AggregateOutcome::error();
            }
        };

        if sites.is_empty() {
            info!("No sites available");
            return AggregateOutcome::empty();
        }

        let site_count = sites.len();
        let dispatcher = Dispatcher::new(Arc::clone(&self.client), query).started_at(start);
        let outcome = self.strategy.dispatch(&dispatcher, sites).await;

        info!(
            "Searched {} sites: {} results, {} failed, {:?}",
            site_count,
            outcome.result_count(),
            outcome.error_sites.len(),
            start.elapsed()
        );
        outcome
    }
}
