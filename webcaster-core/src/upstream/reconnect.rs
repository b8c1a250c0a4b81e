//! Reconnect policy for the upstream relay

use std::time::Duration;

/// Fixed-delay reconnect policy
///
/// Every lost connection is retried after the same delay for as long as the
/// broadcaster stays connected. There is no backoff growth and no cap.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    delay: Duration,
    attempts: u32,
}

impl ReconnectPolicy {
    pub fn fixed(delay: Duration) -> Self {
        Self { delay, attempts: 0 }
    }

    /// Record a connect attempt and return its number, starting at 1
    pub fn begin_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }

    /// Delay before the next attempt, or `None` once the client is gone
    pub fn should_reconnect(&self, client_alive: bool) -> Option<Duration> {
        client_alive.then_some(self.delay)
    }

    /// Connect attempts made so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}
