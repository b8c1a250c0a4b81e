//! Streaming session states

use serde::{Deserialize, Serialize};

/// Lifecycle of a broadcaster connection
///
/// `Closed` is terminal and reachable from every other state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Upgrade accepted, waiting for `hello`
    #[default]
    Connected,
    /// `hello` received, authentication in flight
    Authenticating,
    /// Mount registered, upstream relay running
    Authenticated,
    Closed,
}

impl SessionState {
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}
