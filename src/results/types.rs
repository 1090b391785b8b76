//! Result type definitions

use serde::{Deserialize, Serialize};

/// A single record returned by a site
///
/// The aggregator never looks inside; it is collected and passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchResult(pub serde_json::Value);

impl SearchResult {
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for SearchResult {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Why a site contributed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteErrorKind {
    /// Connection or transport failure
    Network,
    /// The site's own request timeout elapsed
    Timeout,
    /// Non-2xx status
    Status,
    /// Body was not the expected shape
    Parse,
    /// The task running the call panicked or was cancelled
    Panicked,
    /// Still in flight when the overall deadline fired
    Abandoned,
}

impl std::fmt::Display for SiteErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SiteErrorKind::Network => "network error",
            SiteErrorKind::Timeout => "timeout",
            SiteErrorKind::Status => "http status error",
            SiteErrorKind::Parse => "parse error",
            SiteErrorKind::Panicked => "task failure",
            SiteErrorKind::Abandoned => "abandoned at deadline",
        };
        write!(f, "{}", s)
    }
}

/// A site that failed during one aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteFailure {
    /// Site name
    pub site: String,
    pub kind: SiteErrorKind,
    /// Human-readable detail for logs
    pub message: String,
}

impl SiteFailure {
    pub fn new(site: impl Into<String>, kind: SiteErrorKind, message: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Timing information for a site that answered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    pub site: String,
    pub time_ms: u64,
    pub result_count: usize,
}
