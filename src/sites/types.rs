//! Site definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One independently operated search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// URL template; `{query}` is replaced by the encoded query
    pub search_url: String,
    /// Dotted path to the result array in the JSON body
    #[serde(default)]
    pub results_path: Option<String>,
    /// Adult-only site, hidden whenever filtering is on
    #[serde(default)]
    pub adult: bool,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Extra headers sent with every request to this site
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Per-site request timeout in seconds
    #[serde(default)]
    pub timeout: Option<f64>,
}

fn default_enabled() -> bool {
    true
}

impl Site {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        search_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            search_url: search_url.into(),
            results_path: None,
            adult: false,
            enabled: true,
            headers: HashMap::new(),
            timeout: None,
        }
    }

    pub fn with_results_path(mut self, path: impl Into<String>) -> Self {
        self.results_path = Some(path.into());
        self
    }

    pub fn adult(mut self, adult: bool) -> Self {
        self.adult = adult;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Whether this site may be served under the given filter flag
    pub fn is_visible(&self, filter_adult: bool) -> bool {
        self.enabled && !(filter_adult && self.adult)
    }

    /// Build the request URL for a query
    pub fn url_for(&self, query: &str) -> String {
        self.search_url
            .replace("{query}", &urlencoding::encode(query))
    }
}
