//! Configuration for the authentication service

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where and how to validate broadcaster passwords
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Endpoint receiving the `POST` with `auth` and `mount` form fields
    #[serde(default)]
    pub url: String,

    /// Request timeout in seconds; a timeout counts as a denial
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AuthConfig {
    /// Create a config for the given endpoint with the default timeout
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// An endpoint is required to authenticate anyone
    pub fn is_valid(&self) -> bool {
        !self.url.is_empty()
    }
}
