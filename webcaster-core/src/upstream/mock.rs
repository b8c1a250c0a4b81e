//! In-memory connector for tests
//!
//! Each successful connect hands the server half of a `tokio::io::duplex`
//! pipe to the test through a channel, so the test can play Icecast.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, DuplexStream};
use tokio::sync::mpsc;

use super::UpstreamConfig;
use super::connector::{BoxedStream, Connector};

const DUPLEX_CAPACITY: usize = 64 * 1024;

enum Step {
    Refuse,
    Hang,
}

/// Connector whose attempts follow a script; unscripted attempts succeed
pub struct MockConnector {
    script: Mutex<VecDeque<Step>>,
    accepted_tx: mpsc::UnboundedSender<DuplexStream>,
    attempts: AtomicU32,
}

impl MockConnector {
    /// Returns the connector and the receiver of accepted server halves
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DuplexStream>) {
        let (accepted_tx, accepted_rx) = mpsc::unbounded_channel();
        let connector = Self {
            script: Mutex::new(VecDeque::new()),
            accepted_tx,
            attempts: AtomicU32::new(0),
        };
        (connector, accepted_rx)
    }

    /// Refuse the next `count` attempts
    pub fn refuse_next(&self, count: usize) {
        let mut script = self.script.lock().unwrap_or_else(PoisonError::into_inner);
        script.extend((0..count).map(|_| Step::Refuse));
    }

    /// Make the next attempt never complete
    pub fn hang_next(&self) {
        let mut script = self.script.lock().unwrap_or_else(PoisonError::into_inner);
        script.push_back(Step::Hang);
    }

    /// Connect attempts seen so far
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, _config: &UpstreamConfig) -> io::Result<BoxedStream> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let step = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match step {
            Some(Step::Refuse) => Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )),
            Some(Step::Hang) => std::future::pending().await,
            None => {
                let (client, server) = tokio::io::duplex(DUPLEX_CAPACITY);
                let _ = self.accepted_tx.send(server);
                Ok(Box::new(client))
            }
        }
    }
}

/// Read a request head up to and including its terminating blank line
pub async fn read_request_head<R: AsyncRead + Unpin>(reader: &mut R) -> io::Result<String> {
    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\n\n") {
        if reader.read(&mut byte).await? == 0 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        head.push(byte[0]);
    }
    String::from_utf8(head).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
