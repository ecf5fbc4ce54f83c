use serde::Serialize;

use super::Platform;

/// Result of one classification call.
///
/// Built fresh for every analysis and never mutated afterwards; `is_in_app`
/// is derived from the presence of an app name so the two can't disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserSnapshot {
    is_in_app: bool,
    platform: Platform,
    user_agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_name: Option<String>,
}

impl BrowserSnapshot {
    pub fn new(user_agent: impl Into<String>, platform: Platform, app_name: Option<String>) -> Self {
        Self {
            is_in_app: app_name.is_some(),
            platform,
            user_agent: user_agent.into(),
            app_name,
        }
    }

    pub fn is_in_app(&self) -> bool {
        self.is_in_app
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The raw User-Agent this snapshot was derived from.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn app_name(&self) -> Option<&str> {
        self.app_name.as_deref()
    }
}
