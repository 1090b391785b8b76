//! Filter policy resolution

use super::store::PreferenceStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Whether adult content is filtered for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterPolicy {
    pub filter_adult: bool,
}

impl FilterPolicy {
    pub const FILTERED: FilterPolicy = FilterPolicy { filter_adult: true };
    pub const UNFILTERED: FilterPolicy = FilterPolicy {
        filter_adult: false,
    };
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self::FILTERED
    }
}

/// Resolves a caller's filter policy, failing safe to filtering on
#[derive(Clone)]
pub struct FilterPolicyResolver {
    store: Arc<dyn PreferenceStore>,
    lookup_timeout: Duration,
}

impl FilterPolicyResolver {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            store,
            lookup_timeout: Duration::from_secs(2),
        }
    }

    pub fn with_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    /// Filtering is lifted only when the stored preference is explicitly
    /// `false` and the caller asked for adult content.
    pub async fn resolve(&self, user_id: Option<&str>, include_adult: bool) -> FilterPolicy {
        let should_filter = match user_id {
            None => true,
            Some(user) => self.stored_should_filter(user).await,
        };

        FilterPolicy {
            filter_adult: should_filter || !include_adult,
        }
    }

    async fn stored_should_filter(&self, user: &str) -> bool {
        match timeout(self.lookup_timeout, self.store.get_filter_preference(user)).await {
            Ok(Ok(preference)) => {
                debug!("Preference for {}: {:?}", user, preference);
                preference != Some(false)
            }
            Ok(Err(e)) => {
                warn!("Preference lookup failed for {}, filtering: {}", user, e);
                true
            }
            Err(_) => {
                warn!(
                    "Preference lookup for {} timed out after {:?}, filtering",
                    user, self.lookup_timeout
                );
                true
            }
        }
    }
}
