//! Per-user preference storage

use crate::config::UserPreference;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Failure to look up a user's preference
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference store unavailable: {0}")]
    Unavailable(String),
    #[error("malformed preference for user {user}: {reason}")]
    Malformed { user: String, reason: String },
}

/// Source of per-user adult-content filter preferences
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// `Ok(None)` when the user has no stored preference
    async fn get_filter_preference(&self, user_id: &str) -> Result<Option<bool>, PreferenceError>;
}

/// Preference store held in memory, seeded from settings
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: RwLock<HashMap<String, UserPreference>>,
}

impl MemoryPreferenceStore {
    pub fn new(entries: HashMap<String, UserPreference>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Store or replace a user's preference
    pub fn set(&self, user_id: impl Into<String>, filter_adult: Option<bool>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(user_id.into(), UserPreference { filter_adult });
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get_filter_preference(&self, user_id: &str) -> Result<Option<bool>, PreferenceError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| PreferenceError::Unavailable(e.to_string()))?;
        Ok(entries.get(user_id).and_then(|p| p.filter_adult))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryPreferenceStore::default();
        assert!(store.is_empty());
        assert_eq!(store.get_filter_preference("bob").await.unwrap(), None);

        store.set("bob", Some(false));
        assert_eq!(store.get_filter_preference("bob").await.unwrap(), Some(false));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_seeded_from_settings() {
        let mut entries = HashMap::new();
        entries.insert(
            "erin".to_string(),
            UserPreference {
                filter_adult: Some(true),
            },
        );
        entries.insert("frank".to_string(), UserPreference::default());
        let store = MemoryPreferenceStore::new(entries);

        let erin = tokio_test::block_on(store.get_filter_preference("erin")).unwrap();
        let frank = tokio_test::block_on(store.get_filter_preference("frank")).unwrap();
        assert_eq!(erin, Some(true));
        assert_eq!(frank, None);
    }
}
