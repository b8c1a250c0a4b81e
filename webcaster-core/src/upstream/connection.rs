//! A single upstream connection attempt
//!
//! A fresh [`UpstreamConnection`] exists per connect; the stream it owns is
//! always fully connected, so nothing is ever written mid-connect.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::debug;

use super::connector::BoxedStream;
use super::handshake::{self, ContinueDetector};
use super::UpstreamConfig;
use crate::error::UpstreamError;
use crate::mount::MountId;

pub(crate) struct UpstreamConnection {
    stream: BoxedStream,
    detector: ContinueDetector,
    chunked: bool,
}

impl UpstreamConnection {
    pub(crate) fn new(stream: BoxedStream, chunked: bool) -> Self {
        Self {
            stream,
            detector: ContinueDetector::new(),
            chunked,
        }
    }

    /// Write the `PUT` request head
    pub(crate) async fn send_handshake(
        &mut self,
        mount: &MountId,
        config: &UpstreamConfig,
    ) -> Result<(), UpstreamError> {
        let head = handshake::request_head(mount, config);
        for line in head.lines().filter(|line| !line.starts_with("Authorization")) {
            debug!(mount = %mount, line, "Upstream request");
        }
        self.stream
            .write_all(head.as_bytes())
            .await
            .map_err(UpstreamError::Write)?;
        self.stream.flush().await.map_err(UpstreamError::Write)
    }

    /// Read response bytes; `Closed` on EOF
    pub(crate) async fn read(&mut self, buf: &mut [u8]) -> Result<usize, UpstreamError> {
        match self.stream.read(buf).await {
            Ok(0) => Err(UpstreamError::Closed),
            Ok(n) => Ok(n),
            Err(e) => Err(UpstreamError::Read(e)),
        }
    }

    /// Scan response bytes; returns true the first time `100 Continue` shows up
    pub(crate) fn observe(&mut self, data: &[u8]) -> bool {
        let was_ready = self.detector.is_seen();
        self.detector.feed(data) && !was_ready
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.detector.is_seen()
    }

    pub(crate) async fn write_payload(&mut self, payload: &[u8]) -> Result<(), UpstreamError> {
        if payload.is_empty() {
            return Ok(());
        }
        let result = if self.chunked {
            self.stream.write_all(&handshake::encode_chunk(payload)).await
        } else {
            self.stream.write_all(payload).await
        };
        result.map_err(UpstreamError::Write)
    }

    /// End the request gracefully: terminating chunk if framing, then FIN
    pub(crate) async fn finish(&mut self) -> Result<(), UpstreamError> {
        if self.chunked && self.is_ready() {
            self.stream
                .write_all(handshake::LAST_CHUNK)
                .await
                .map_err(UpstreamError::Write)?;
        }
        self.stream.shutdown().await.map_err(UpstreamError::Write)
    }
}
