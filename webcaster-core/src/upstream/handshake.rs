//! Icecast source handshake: request head, `100 Continue` detection and
//! optional chunk framing

use super::UpstreamConfig;
use crate::USER_AGENT;
use crate::mount::MountId;

/// Response text that releases audio for sending
pub const CONTINUE_MARKER: &str = "100 Continue";

/// Terminating chunk written on graceful end when chunk framing is on
pub const LAST_CHUNK: &[u8] = b"0\r\n\r\n";

/// Request head sent right after connecting
///
/// Every line, including the final blank one, ends in a bare `\n`.
pub fn request_head(mount: &MountId, config: &UpstreamConfig) -> String {
    let lines = [
        format!("PUT {mount} HTTP/1.1"),
        format!("Host: {}", config.address()),
        format!("Authorization: Basic {}", config.basic_credentials()),
        format!("User-Agent: {USER_AGENT}"),
        "Transfer-Encoding: chunked".to_string(),
        format!("Content-Type: {}", config.content_type),
        format!("Ice-Public: {}", u8::from(config.ice_public)),
        format!("Ice-Name: {}", config.ice_name),
        "Expect: 100-continue".to_string(),
        String::new(),
    ];

    let mut head = String::new();
    for line in lines {
        head.push_str(&line);
        head.push('\n');
    }
    head
}

/// Wrap a payload in a single HTTP/1.1 chunk
pub fn encode_chunk(payload: &[u8]) -> Vec<u8> {
    let mut chunk = format!("{:x}\r\n", payload.len()).into_bytes();
    chunk.extend_from_slice(payload);
    chunk.extend_from_slice(b"\r\n");
    chunk
}

/// Watches response bytes for [`CONTINUE_MARKER`]
///
/// The marker may be split across reads, so the tail of each read is kept
/// until the next one arrives.
#[derive(Debug, Default)]
pub struct ContinueDetector {
    tail: Vec<u8>,
    seen: bool,
}

impl ContinueDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed response bytes; returns true once the marker has been seen
    pub fn feed(&mut self, data: &[u8]) -> bool {
        if self.seen {
            return true;
        }

        let marker = CONTINUE_MARKER.as_bytes();
        let mut window = std::mem::take(&mut self.tail);
        window.extend_from_slice(data);

        if window.windows(marker.len()).any(|w| w == marker) {
            self.seen = true;
            return true;
        }

        let keep = window.len().saturating_sub(marker.len() - 1);
        self.tail = window.split_off(keep);
        false
    }

    pub fn is_seen(&self) -> bool {
        self.seen
    }
}
