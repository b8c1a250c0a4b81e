//! WebSocket broadcaster client for integration tests

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderValue, StatusCode};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{Error, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A browser-like broadcaster
pub struct Broadcaster {
    ws: WsStream,
}

#[allow(dead_code)]
impl Broadcaster {
    /// Connect to `mount` requesting the `webcast` subprotocol
    pub async fn connect(addr: SocketAddr, mount: &str) -> Self {
        Self::try_connect(addr, mount, "webcast", None)
            .await
            .expect("upgrade refused")
    }

    /// Attempt an upgrade, returning the HTTP status on refusal
    pub async fn try_connect(
        addr: SocketAddr,
        mount: &str,
        protocols: &str,
        origin: Option<&str>,
    ) -> Result<Self, StatusCode> {
        let mut request = format!("ws://{addr}{mount}").into_client_request().unwrap();
        let headers = request.headers_mut();
        headers.insert(
            "Sec-WebSocket-Protocol",
            HeaderValue::from_str(protocols).unwrap(),
        );
        if let Some(origin) = origin {
            headers.insert("Origin", HeaderValue::from_str(origin).unwrap());
        }

        match tokio_tungstenite::connect_async(request).await {
            Ok((ws, _)) => Ok(Self { ws }),
            Err(Error::Http(response)) => Err(response.status()),
            Err(e) => panic!("unexpected handshake error: {e}"),
        }
    }

    pub async fn hello(&mut self, password: &str) {
        let hello = serde_json::json!({ "type": "hello", "data": { "password": password } });
        self.send_text(&hello.to_string()).await;
    }

    pub async fn send_text(&mut self, text: &str) {
        self.ws.send(Message::Text(text.into())).await.unwrap();
    }

    pub async fn send_audio(&mut self, data: &[u8]) {
        self.ws
            .send(Message::Binary(data.to_vec().into()))
            .await
            .unwrap();
    }

    /// Wait for the server to close the connection
    pub async fn closed(&mut self) -> Option<CloseFrame> {
        let next = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                match self.ws.next().await {
                    Some(Ok(Message::Close(frame))) => return frame,
                    Some(Ok(_)) => continue,
                    Some(Err(_)) | None => return None,
                }
            }
        });
        next.await.expect("connection was not closed")
    }

    pub async fn disconnect(mut self) {
        let _ = self.ws.close(None).await;
    }
}
