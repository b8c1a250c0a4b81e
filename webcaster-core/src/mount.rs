//! Mount identifiers

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a broadcast channel
///
/// Taken verbatim from the inbound request path (e.g. `/show1`) and reused as
/// the upstream `PUT` target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MountId(String);

impl MountId {
    /// Create a mount identifier from a request path
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The mount as received, including the leading `/`
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The mount with its leading `/` stripped, as the auth service expects it
    pub fn without_separator(&self) -> &str {
        self.0.strip_prefix('/').unwrap_or(&self.0)
    }
}

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MountId {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for MountId {
    fn from(path: String) -> Self {
        Self(path)
    }
}
