//! Session transport over an axum WebSocket

use std::borrow::Cow;

use async_trait::async_trait;
use axum::extract::ws::{CloseFrame, Message, WebSocket};
use tracing::debug;
use webcaster_core::{Inbound, InboundTransport};

/// Feeds text and binary frames to a session; pings are answered by axum
pub struct WsTransport {
    socket: WebSocket,
}

impl WsTransport {
    pub fn new(socket: WebSocket) -> Self {
        Self { socket }
    }
}

#[async_trait]
impl InboundTransport for WsTransport {
    async fn recv(&mut self) -> Option<Inbound> {
        while let Some(message) = self.socket.recv().await {
            match message {
                Ok(Message::Text(text)) => return Some(Inbound::Text(text)),
                Ok(Message::Binary(data)) => return Some(Inbound::Binary(data)),
                Ok(Message::Close(_)) => {
                    debug!("WebSocket client sent close frame");
                    return None;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    debug!(error = %e, "WebSocket receive failed");
                    return None;
                }
            }
        }
        None
    }

    async fn close(&mut self, code: u16, reason: &str) {
        let frame = CloseFrame {
            code,
            reason: Cow::Owned(reason.to_string()),
        };
        if let Err(e) = self.socket.send(Message::Close(Some(frame))).await {
            debug!(error = %e, "Failed to send close frame");
        }
    }
}
