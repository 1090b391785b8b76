//! Scripted search client for strategy and aggregator tests

use crate::network::{SearchClient, SearchError};
use crate::results::SearchResult;
use crate::sites::Site;
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub struct Behavior {
    pub results: usize,
    pub delay: Duration,
    pub fail: bool,
    pub panic: bool,
}

impl Behavior {
    pub fn results(n: usize) -> Self {
        Self {
            results: n,
            ..Default::default()
        }
    }

    pub fn fail() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn panic() -> Self {
        Self {
            panic: true,
            ..Default::default()
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Answers per site name, recording calls, completions and peak concurrency
#[derive(Default)]
pub struct MockClient {
    behaviors: HashMap<String, Behavior>,
    default: Behavior,
    calls: Mutex<Vec<String>>,
    queries: Mutex<Vec<String>>,
    finished: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, site: &str, behavior: Behavior) -> Self {
        self.behaviors.insert(site.to_string(), behavior);
        self
    }

    pub fn with_default(mut self, behavior: Behavior) -> Self {
        self.default = behavior;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Queries as received, one per call
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    /// Sites whose call ran to the end of its delay
    pub fn finished(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

/// Result records produced for a site: `{"site": name, "n": i}`
pub fn records(site: &str, n: usize) -> Vec<SearchResult> {
    (0..n).map(|i| json!({ "site": site, "n": i }).into()).collect()
}

pub fn sites(names: &[&str]) -> Vec<Site> {
    names
        .iter()
        .map(|n| Site::new(*n, *n, format!("http://{}.test/?q={{query}}", n)))
        .collect()
}

pub fn numbered_sites(prefix: &str, count: usize) -> Vec<Site> {
    (0..count)
        .map(|i| {
            let name = format!("{}{}", prefix, i);
            Site::new(name.clone(), name.clone(), format!("http://{}.test/", name))
        })
        .collect()
}

#[async_trait]
impl SearchClient for MockClient {
    async fn search(&self, site: &Site, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        self.calls.lock().unwrap().push(site.name.clone());
        self.queries.lock().unwrap().push(query.to_string());
        let behavior = self
            .behaviors
            .get(&site.name)
            .copied()
            .unwrap_or(self.default);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !behavior.delay.is_zero() {
            tokio::time::sleep(behavior.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.finished.lock().unwrap().push(site.name.clone());

        if behavior.panic {
            panic!("scripted panic for {}", site.name);
        }
        if behavior.fail {
            return Err(SearchError::Network(format!("{} unreachable", site.name)));
        }
        Ok(records(&site.name, behavior.results))
    }
}
