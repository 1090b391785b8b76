//! Caller-side request models

use serde::{Deserialize, Serialize};

/// Who is asking, and whether they asked for adult content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerContext {
    /// User identity, from an explicit parameter or a bearer token
    #[serde(default)]
    pub user_id: Option<String>,
    /// Explicit request to include adult content
    #[serde(default)]
    pub include_adult: bool,
}

impl CallerContext {
    /// Anonymous caller, adult content not requested
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            include_adult: false,
        }
    }

    pub fn with_include_adult(mut self, include_adult: bool) -> Self {
        self.include_adult = include_adult;
        self
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref().filter(|u| !u.is_empty())
    }
}
