//! Application state shared across handlers

use crate::config::Settings;
use crate::network::HttpSearchClient;
use crate::preferences::MemoryPreferenceStore;
use crate::search::Aggregator;
use crate::sites::{FileSiteDirectory, SiteDirectory, StaticSiteDirectory};
use std::sync::Arc;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Aggregation engine
    pub aggregator: Arc<Aggregator>,
}

impl AppState {
    pub fn new(settings: Settings, aggregator: Aggregator) -> Self {
        Self {
            settings: Arc::new(settings),
            aggregator: Arc::new(aggregator),
        }
    }

    /// Build the production collaborators described by the settings
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let directory: Arc<dyn SiteDirectory> = match settings.sites.path {
            Some(ref path) => {
                info!("Reading sites from {} on every search", path.display());
                Arc::new(FileSiteDirectory::new(path))
            }
            None => {
                info!("Using {} inline sites", settings.sites.list.len());
                Arc::new(StaticSiteDirectory::new(settings.sites.list.clone()))
            }
        };

        let store = Arc::new(MemoryPreferenceStore::new(settings.preferences.clone()));
        let client = Arc::new(HttpSearchClient::with_settings(&settings.outgoing)?);
        let aggregator = Aggregator::from_settings(&settings.search, directory, store, client);
        info!("Dispatch strategy: {}", aggregator.strategy_name());

        Ok(Self::new(settings, aggregator))
    }

    /// max-age for cacheable search responses
    pub fn cache_max_age(&self) -> u64 {
        self.settings.server.cache_max_age
    }
}
