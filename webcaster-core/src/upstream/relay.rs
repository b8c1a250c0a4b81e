//! Reconnecting relay to the upstream server
//!
//! [`UpstreamRelay`] is the handle a session owns. Behind it a supervisor
//! task runs connect → handshake → forward cycles, creating a fresh
//! [`UpstreamConnection`] each time and waiting a fixed delay between them
//! until the session's cancellation token fires. Dropping the handle fires
//! the token too.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

use super::connection::UpstreamConnection;
use super::connector::Connector;
use super::reconnect::ReconnectPolicy;
use super::state::{MountEvent, RelayEvent};
use super::UpstreamConfig;
use crate::error::UpstreamError;
use crate::mount::MountId;

const EVENT_CAPACITY: usize = 64;
const READ_BUFFER_SIZE: usize = 4096;

/// How long queued audio may take to drain once shutdown is requested
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Handle to a running upstream relay
pub struct UpstreamRelay {
    mount: MountId,
    ready: Arc<AtomicBool>,
    audio_tx: mpsc::UnboundedSender<Vec<u8>>,
    event_tx: broadcast::Sender<RelayEvent>,
    shutdown: CancellationToken,
    _cancel_on_drop: DropGuard,
    task: JoinHandle<()>,
}

impl UpstreamRelay {
    /// Start relaying for `mount`; runs until `shutdown` is cancelled or
    /// the handle is dropped
    pub fn spawn(
        mount: MountId,
        config: Arc<UpstreamConfig>,
        connector: Arc<dyn Connector>,
        shutdown: CancellationToken,
    ) -> Self {
        Self::start(mount, config, connector, shutdown, None)
    }

    /// Like [`spawn`](Self::spawn), also publishing every event on `monitor`
    pub fn spawn_monitored(
        mount: MountId,
        config: Arc<UpstreamConfig>,
        connector: Arc<dyn Connector>,
        shutdown: CancellationToken,
        monitor: broadcast::Sender<MountEvent>,
    ) -> Self {
        Self::start(mount, config, connector, shutdown, Some(monitor))
    }

    fn start(
        mount: MountId,
        config: Arc<UpstreamConfig>,
        connector: Arc<dyn Connector>,
        shutdown: CancellationToken,
        monitor: Option<broadcast::Sender<MountEvent>>,
    ) -> Self {
        let (audio_tx, audio_rx) = mpsc::unbounded_channel();
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        let ready = Arc::new(AtomicBool::new(false));

        let supervisor = Supervisor {
            mount: mount.clone(),
            policy: ReconnectPolicy::fixed(config.reconnect_delay()),
            config,
            connector,
            ready: Arc::clone(&ready),
            audio_rx,
            event_tx: event_tx.clone(),
            monitor,
            shutdown: shutdown.clone(),
        };
        let task = tokio::spawn(supervisor.run());

        Self {
            mount,
            ready,
            audio_tx,
            event_tx,
            _cancel_on_drop: shutdown.clone().drop_guard(),
            shutdown,
            task,
        }
    }

    pub fn mount(&self) -> &MountId {
        &self.mount
    }

    /// True once the current connection has seen `100 Continue`
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Queue audio for the current connection; false if the relay has stopped
    ///
    /// Audio that reaches a connection before its handshake completes, or
    /// that is still queued when a connection drops, is discarded.
    pub fn send(&self, payload: Vec<u8>) -> bool {
        self.audio_tx.send(payload).is_ok()
    }

    /// Subscribe to relay lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<RelayEvent> {
        self.event_tx.subscribe()
    }

    /// Ask the relay to stop: a live connection is ended gracefully, a
    /// connect in progress is abandoned and a pending reconnect is cancelled
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the relay and wait for its task to finish
    pub async fn close(self) {
        self.shutdown.cancel();
        if let Err(e) = self.task.await {
            warn!(mount = %self.mount, error = %e, "Upstream relay task failed");
        }
    }
}

struct Supervisor {
    mount: MountId,
    config: Arc<UpstreamConfig>,
    connector: Arc<dyn Connector>,
    policy: ReconnectPolicy,
    ready: Arc<AtomicBool>,
    audio_rx: mpsc::UnboundedReceiver<Vec<u8>>,
    event_tx: broadcast::Sender<RelayEvent>,
    monitor: Option<broadcast::Sender<MountEvent>>,
    shutdown: CancellationToken,
}

impl Supervisor {
    async fn run(mut self) {
        loop {
            let attempt = self.policy.begin_attempt();
            self.emit(RelayEvent::Connecting { attempt });
            debug!(
                mount = %self.mount,
                attempt,
                address = %self.config.address(),
                "Connecting to upstream"
            );

            let connected = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                result = self.connector.connect(&self.config) => result,
            };

            let error = match connected {
                Ok(stream) => {
                    info!(mount = %self.mount, attempt, "Upstream connection established");
                    let connection = UpstreamConnection::new(stream, self.config.chunked_framing);
                    match self.serve(connection, attempt).await {
                        Ok(()) => break,
                        Err(e) => e,
                    }
                }
                Err(e) => UpstreamError::Connect(e),
            };

            self.set_ready(false);
            self.discard_pending();
            warn!(mount = %self.mount, attempt, error = %error, "Upstream connection lost");
            self.emit(RelayEvent::Disconnected {
                attempt,
                reason: error.to_string(),
            });

            let Some(delay) = self.policy.should_reconnect(!self.shutdown.is_cancelled()) else {
                break;
            };
            self.emit(RelayEvent::Reconnecting { delay });
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        self.set_ready(false);
        info!(
            mount = %self.mount,
            attempts = self.policy.attempts(),
            "Upstream relay stopped"
        );
        self.emit(RelayEvent::Stopped);
    }

    /// Handshake, then relay audio until shutdown (`Ok`) or failure (`Err`)
    ///
    /// Writes are never left waiting on a peer that stopped reading: once
    /// shutdown is requested they get [`DRAIN_TIMEOUT`] to complete.
    async fn serve(
        &mut self,
        mut connection: UpstreamConnection,
        attempt: u32,
    ) -> Result<(), UpstreamError> {
        tokio::select! {
            result = connection.send_handshake(&self.mount, &self.config) => result?,
            _ = self.shutdown.cancelled() => return Ok(()),
        }
        self.emit(RelayEvent::Connected { attempt });

        let mut buf = vec![0u8; READ_BUFFER_SIZE];
        loop {
            // Queued audio is flushed before a requested shutdown is honoured
            tokio::select! {
                biased;

                read = connection.read(&mut buf) => {
                    let data = &buf[..read?];
                    debug!(
                        mount = %self.mount,
                        response = %String::from_utf8_lossy(data).trim(),
                        "Upstream data received"
                    );
                    if connection.observe(data) {
                        info!(mount = %self.mount, attempt, "Ready to send data");
                        self.set_ready(true);
                        self.emit(RelayEvent::Ready { attempt });
                    }
                }
                Some(payload) = self.audio_rx.recv() => {
                    if connection.is_ready() {
                        tokio::select! {
                            result = connection.write_payload(&payload) => result?,
                            _ = drain_expired(&self.shutdown) => return Err(UpstreamError::Stalled),
                        }
                    } else {
                        debug!(
                            mount = %self.mount,
                            bytes = payload.len(),
                            "Discarding audio received before handshake completed"
                        );
                    }
                }
                _ = self.shutdown.cancelled() => {
                    debug!(mount = %self.mount, "Ending upstream connection");
                    return tokio::time::timeout(DRAIN_TIMEOUT, connection.finish())
                        .await
                        .unwrap_or(Err(UpstreamError::Stalled));
                }
            }
        }
    }

    fn discard_pending(&mut self) {
        let mut dropped = 0;
        while let Ok(payload) = self.audio_rx.try_recv() {
            dropped += payload.len();
        }
        if dropped > 0 {
            debug!(mount = %self.mount, bytes = dropped, "Discarded audio queued for lost connection");
        }
    }

    fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    fn emit(&self, event: RelayEvent) {
        if let Some(monitor) = &self.monitor {
            let _ = monitor.send(MountEvent {
                mount: self.mount.clone(),
                event: event.clone(),
            });
        }
        let _ = self.event_tx.send(event);
    }
}

/// Resolves `DRAIN_TIMEOUT` after shutdown is requested
async fn drain_expired(shutdown: &CancellationToken) {
    shutdown.cancelled().await;
    tokio::time::sleep(DRAIN_TIMEOUT).await;
}
