//! Aggregate outcome of one search request

use super::types::{SearchResult, SiteFailure, Timing};
use serde::Serialize;

/// Everything one aggregation produced
///
/// Results are appended in merge order and never reordered. Failures and
/// timings are informational and are not sent to the caller.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateOutcome {
    pub results: Vec<SearchResult>,
    /// Set only when the site directory could not be consulted
    pub errored: bool,
    #[serde(skip)]
    pub error_sites: Vec<SiteFailure>,
    #[serde(skip)]
    pub timings: Vec<Timing>,
}

impl AggregateOutcome {
    /// Empty, successful outcome
    pub fn empty() -> Self {
        Self::default()
    }

    /// Top-level failure with no results
    pub fn error() -> Self {
        Self {
            errored: true,
            ..Default::default()
        }
    }

    /// Append one site's results
    pub fn add_success(&mut self, site: &str, results: Vec<SearchResult>, time_ms: u64) {
        self.timings.push(Timing {
            site: site.to_string(),
            time_ms,
            result_count: results.len(),
        });
        self.results.extend(results);
    }

    /// Record one site's failure
    pub fn add_failure(&mut self, failure: SiteFailure) {
        self.error_sites.push(failure);
    }

    /// Append another outcome, keeping order
    pub fn extend(&mut self, other: AggregateOutcome) {
        self.results.extend(other.results);
        self.error_sites.extend(other.error_sites);
        self.timings.extend(other.timings);
        self.errored |= other.errored;
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }
}
