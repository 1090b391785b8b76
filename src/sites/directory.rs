//! Site directory: where the per-request site set comes from

use super::types::Site;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Failure to consult the site registry
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("site registry unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read site registry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid site registry {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Source of searchable sites
///
/// Called once per request. Implementations must not cache across calls:
/// the returned set is a snapshot honoring the filter flag at call time.
#[async_trait]
pub trait SiteDirectory: Send + Sync {
    /// Ordered list of enabled sites; adult sites are excluded when `filter_adult` is set
    async fn list_sites(&self, filter_adult: bool) -> Result<Vec<Site>, DirectoryError>;
}

/// Directory over a fixed in-memory list
#[derive(Debug, Clone, Default)]
pub struct StaticSiteDirectory {
    sites: Vec<Site>,
}

impl StaticSiteDirectory {
    pub fn new(sites: Vec<Site>) -> Self {
        Self { sites }
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

#[async_trait]
impl SiteDirectory for StaticSiteDirectory {
    async fn list_sites(&self, filter_adult: bool) -> Result<Vec<Site>, DirectoryError> {
        Ok(visible(self.sites.iter().cloned(), filter_adult))
    }
}

/// Directory backed by a YAML file that is re-read on every call
///
/// The file holds a top-level list of sites.
#[derive(Debug, Clone)]
pub struct FileSiteDirectory {
    path: PathBuf,
}

impl FileSiteDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SiteDirectory for FileSiteDirectory {
    async fn list_sites(&self, filter_adult: bool) -> Result<Vec<Site>, DirectoryError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| DirectoryError::Io {
                path: self.path.clone(),
                source,
            })?;

        let sites: Vec<Site> =
            serde_yaml::from_str(&content).map_err(|source| DirectoryError::Parse {
                path: self.path.clone(),
                source,
            })?;

        debug!(
            "Read {} sites from {}",
            sites.len(),
            self.path.display()
        );

        Ok(visible(sites.into_iter(), filter_adult))
    }
}

fn visible(sites: impl Iterator<Item = Site>, filter_adult: bool) -> Vec<Site> {
    sites.filter(|s| s.is_visible(filter_adult)).collect()
}

/// Resolves the site set for a filter policy
#[derive(Clone)]
pub struct SiteSelector {
    directory: Arc<dyn SiteDirectory>,
}

impl SiteSelector {
    pub fn new(directory: Arc<dyn SiteDirectory>) -> Self {
        Self { directory }
    }

    /// Delegate to the directory; an empty set is a valid answer
    pub async fn select(&self, filter_adult: bool) -> Result<Vec<Site>, DirectoryError> {
        self.directory.list_sites(filter_adult).await
    }
}
