//! HTTP client for querying sites

use super::traits::{SearchClient, SearchError};
use crate::config::OutgoingSettings;
use crate::results::SearchResult;
use crate::sites::Site;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// reqwest-backed search client shared by all site calls
#[derive(Clone)]
pub struct HttpSearchClient {
    client: Client,
    default_timeout: Duration,
    user_agent: String,
}

impl HttpSearchClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let timeout = settings.request_timeout;
        if !timeout.is_finite() || timeout <= 0.0 {
            anyhow::bail!("invalid request timeout: {}", timeout);
        }
        let default_timeout = Duration::from_secs_f64(timeout);

        let mut builder = Client::builder()
            .timeout(default_timeout)
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        Ok(Self {
            client: builder.build()?,
            default_timeout,
            user_agent: settings.useragent.clone(),
        })
    }

    /// Per-site timeout, falling back to the default for unusable values
    fn timeout_for(&self, site: &Site) -> Duration {
        site.timeout
            .filter(|t| t.is_finite() && *t > 0.0)
            .map(Duration::from_secs_f64)
            .unwrap_or(self.default_timeout)
    }
}

#[async_trait]
impl SearchClient for HttpSearchClient {
    async fn search(&self, site: &Site, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let url = Url::parse(&site.url_for(query))
            .map_err(|e| SearchError::Network(format!("invalid url for {}: {}", site.name, e)))?;

        let mut req_builder = self
            .client
            .get(url)
            .timeout(self.timeout_for(site))
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json");

        for (key, value) in &site.headers {
            req_builder = req_builder.header(key, value);
        }

        let response = req_builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let body: Value =
            serde_json::from_str(&text).map_err(|e| SearchError::Parse(e.to_string()))?;

        let results = extract_results(body, site.results_path.as_deref())?;
        debug!("Site {} returned {} records", site.name, results.len());
        Ok(results)
    }
}

/// Pull the result array out of a response body
///
/// `path` is dot-separated; numeric segments index into arrays.
pub fn extract_results(body: Value, path: Option<&str>) -> Result<Vec<SearchResult>, SearchError> {
    let mut node = body;
    if let Some(path) = path.filter(|p| !p.is_empty()) {
        for segment in path.split('.') {
            node = match node {
                Value::Object(mut map) => map.remove(segment),
                Value::Array(mut items) => match segment.parse::<usize>() {
                    Ok(i) if i < items.len() => Some(items.swap_remove(i)),
                    _ => None,
                },
                _ => None,
            }
            .ok_or_else(|| SearchError::Parse(format!("missing '{}' in '{}'", segment, path)))?;
        }
    }

    match node {
        Value::Array(items) => Ok(items.into_iter().map(SearchResult::from).collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(SearchError::Parse(format!(
            "expected an array of results, found {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
