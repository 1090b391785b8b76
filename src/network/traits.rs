//! Single-site search client seam

use crate::results::{SearchResult, SiteErrorKind};
use crate::sites::Site;
use async_trait::async_trait;
use thiserror::Error;

/// Why one site's search failed
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Parse(String),
}

impl SearchError {
    pub fn kind(&self) -> SiteErrorKind {
        match self {
            SearchError::Network(_) => SiteErrorKind::Network,
            SearchError::Timeout => SiteErrorKind::Timeout,
            SearchError::Status(_) => SiteErrorKind::Status,
            SearchError::Parse(_) => SiteErrorKind::Parse,
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SearchError::Timeout
        } else if let Some(status) = e.status() {
            SearchError::Status(status.as_u16())
        } else if e.is_decode() {
            SearchError::Parse(e.to_string())
        } else {
            SearchError::Network(e.to_string())
        }
    }
}

/// Performs one site's search and normalizes its response into records
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, site: &Site, query: &str) -> Result<Vec<SearchResult>, SearchError>;
}
