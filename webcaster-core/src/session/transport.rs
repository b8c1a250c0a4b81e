//! Abstraction over the inbound broadcaster connection

use async_trait::async_trait;

/// WebSocket close code sent when authentication fails
pub const POLICY_VIOLATION: u16 = 1008;

/// Close reason sent alongside [`POLICY_VIOLATION`]
pub const INVALID_AUTH_REASON: &str = "invalid authentication data";

/// A message from the broadcaster
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Text(String),
    Binary(Vec<u8>),
}

/// Inbound side of a session, implemented over the WebSocket by the server
#[async_trait]
pub trait InboundTransport: Send {
    /// Next message, or `None` once the client is gone
    async fn recv(&mut self) -> Option<Inbound>;

    /// Close the connection with a status code and reason
    async fn close(&mut self, code: u16, reason: &str);
}
