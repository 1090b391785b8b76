//! Settings structures for fanout-search configuration

use crate::sites::Site;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main settings structure loaded from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
    pub sites: SitesSettings,
    /// Per-user filter preferences served by the in-memory store
    pub preferences: HashMap<String, UserPreference>,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (FANOUT_* prefix)
    ///
    /// Values that fail to parse are ignored.
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("FANOUT_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("FANOUT_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("FANOUT_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("FANOUT_STRATEGY") {
            if let Ok(kind) = val.parse() {
                self.search.strategy = kind;
            }
        }
        if let Ok(val) = std::env::var("FANOUT_DEADLINE_MS") {
            if let Ok(ms) = val.parse() {
                self.search.deadline_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("FANOUT_SITES_PATH") {
            self.sites.path = Some(PathBuf::from(val));
        }
    }

    /// Reject values the dispatch strategies cannot work with
    pub fn validate(&self) -> Result<()> {
        let search = &self.search;
        if search.batch_size == 0 {
            bail!("search.batch_size must be greater than zero");
        }
        if search.max_concurrent_batches == 0 {
            bail!("search.max_concurrent_batches must be greater than zero");
        }
        if search.concurrency_cap == 0 {
            bail!("search.concurrency_cap must be greater than zero");
        }
        if search.deadline_ms == 0 {
            bail!("search.deadline_ms must be greater than zero");
        }
        let timeout = self.outgoing.request_timeout;
        if !timeout.is_finite() || timeout <= 0.0 {
            bail!("outgoing.request_timeout must be a positive number of seconds");
        }
        Ok(())
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name reported in logs
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "fanout-search".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// max-age (seconds) sent with successful search responses
    pub cache_max_age: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8888,
            bind_address: "127.0.0.1".to_string(),
            cache_max_age: 60,
        }
    }
}

/// Which dispatch strategy the aggregator runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Every site at once, no deadline of its own
    Unbounded,
    /// Fixed-size batches processed in bounded waves
    Batched,
    /// Priority-first dispatch under a hard wall-clock deadline
    #[default]
    Deadline,
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unbounded" => Ok(Self::Unbounded),
            "batched" => Ok(Self::Batched),
            "deadline" => Ok(Self::Deadline),
            other => Err(format!("unknown strategy: {}", other)),
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Dispatch strategy for this deployment
    pub strategy: StrategyKind,
    /// Sites per batch (batched strategy)
    pub batch_size: usize,
    /// Batches running at the same time (batched strategy)
    pub max_concurrent_batches: usize,
    /// Overall wall-clock budget in milliseconds (deadline strategy)
    pub deadline_ms: u64,
    /// Priority sites allowed into the initial wave
    pub priority_limit: usize,
    /// Size of the initial wave
    pub concurrency_cap: usize,
    /// Result count below which a supplementary wave is sent
    pub coverage_threshold: usize,
    /// Sites in the supplementary wave
    pub supplementary_wave_size: usize,
    /// Budget for the per-user preference lookup in milliseconds
    pub preference_timeout_ms: u64,
    /// Name substrings marking historically high-yield sites
    pub priority_markers: Vec<String>,
}

impl SearchSettings {
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    pub fn preference_timeout(&self) -> Duration {
        Duration::from_millis(self.preference_timeout_ms)
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            batch_size: 25,
            max_concurrent_batches: 3,
            deadline_ms: 9_000,
            priority_limit: 15,
            concurrency_cap: 20,
            coverage_threshold: 100,
            supplementary_wave_size: 15,
            preference_timeout_ms: 2_000,
            priority_markers: default_priority_markers(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default per-site request timeout in seconds
    pub request_timeout: f64,
    /// Idle connections kept per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// User agent sent to every site
    pub useragent: String,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 5.0,
            pool_maxsize: 20,
            verify_ssl: true,
            useragent: format!("fanout-search/{}", crate::VERSION),
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Where the site registry comes from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SitesSettings {
    /// Registry file, re-read on every search
    pub path: Option<PathBuf>,
    /// Inline registry, used when no path is set
    pub list: Vec<Site>,
}

/// A single user's stored preference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreference {
    /// `Some(false)` is the only value that lifts adult filtering
    #[serde(default)]
    pub filter_adult: Option<bool>,
}

fn default_priority_markers() -> Vec<String> {
    ["Official", "Archive", "Library", "Wiki", "Index"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8888);
        assert_eq!(settings.search.strategy, StrategyKind::Deadline);
        assert_eq!(settings.search.batch_size, 25);
        assert_eq!(settings.search.max_concurrent_batches, 3);
        assert_eq!(settings.search.deadline(), Duration::from_secs(9));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
search:
  strategy: batched
  batch_size: 10
sites:
  list:
    - id: one
      name: One Archive
      search_url: "https://one.example/search?q={query}"
      results_path: data.items
preferences:
  alice:
    filter_adult: false
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.search.strategy, StrategyKind::Batched);
        assert_eq!(settings.search.batch_size, 10);
        assert_eq!(settings.search.max_concurrent_batches, 3);
        assert_eq!(settings.sites.list.len(), 1);
        assert!(settings.sites.list[0].enabled);
        assert_eq!(settings.preferences["alice"].filter_adult, Some(false));
    }

    #[test]
    fn test_validate_rejects_zero_batch() {
        let mut settings = Settings::default();
        settings.search.batch_size = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_timeout() {
        for timeout in [f64::NAN, f64::INFINITY, -1.0, 0.0] {
            let mut settings = Settings::default();
            settings.outgoing.request_timeout = timeout;
            assert!(settings.validate().is_err(), "accepted {}", timeout);
        }
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("Unbounded".parse::<StrategyKind>(), Ok(StrategyKind::Unbounded));
        assert_eq!(" deadline ".parse::<StrategyKind>(), Ok(StrategyKind::Deadline));
        assert!("random".parse::<StrategyKind>().is_err());
    }
}
