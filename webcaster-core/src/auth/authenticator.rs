//! Authenticator trait and outcome

use async_trait::async_trait;

use crate::mount::MountId;

/// Result of checking a broadcaster's credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Authorized,
    /// Any failure: wrong password, unexpected status, network error or timeout
    Denied,
}

impl AuthOutcome {
    pub fn is_authorized(self) -> bool {
        matches!(self, Self::Authorized)
    }
}

/// Validates a (mount, password) pair
///
/// Implementations normalise every failure to [`AuthOutcome::Denied`]; the
/// cause is only logged. Callers invoke this once per `hello` and never retry.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, mount: &MountId, password: &str) -> AuthOutcome;
}
