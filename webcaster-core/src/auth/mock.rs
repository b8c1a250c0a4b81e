//! In-process authenticator for tests
//!
//! Authorizes exactly one password and counts how often it was asked,
//! optionally after a delay to keep an authentication in flight.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{AuthOutcome, Authenticator};
use crate::mount::MountId;

/// Authenticator that accepts a single fixed password
pub struct StaticAuthenticator {
    password: String,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StaticAuthenticator {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Hold every answer back for `delay`
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of authentication requests received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn authenticate(&self, _mount: &MountId, password: &str) -> AuthOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if password == self.password {
            AuthOutcome::Authorized
        } else {
            AuthOutcome::Denied
        }
    }
}
