//! One broadcaster connection, from `hello` to disconnect
//!
//! The session reads inbound messages in arrival order while polling an
//! in-flight authentication in the same `select!` loop, so a disconnect
//! always wins over a late authentication result.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, OptionFuture};
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::protocol::ControlMessage;
use super::state::SessionState;
use super::transport::{INVALID_AUTH_REASON, Inbound, InboundTransport, POLICY_VIOLATION};
use crate::auth::{AuthOutcome, Authenticator};
use crate::mount::MountId;
use crate::registry::{MountLease, SessionRegistry};
use crate::upstream::{Connector, MountEvent, UpstreamConfig, UpstreamRelay};

/// Shared collaborators handed to every session
#[derive(Clone)]
pub struct SessionContext {
    pub registry: SessionRegistry,
    pub authenticator: Arc<dyn Authenticator>,
    pub upstream: Arc<UpstreamConfig>,
    pub connector: Arc<dyn Connector>,
    /// Where relays publish their lifecycle events, if anywhere
    pub relay_events: Option<broadcast::Sender<MountEvent>>,
}

pub struct StreamingSession {
    mount: MountId,
    state: SessionState,
    context: SessionContext,
    client_alive: CancellationToken,
    // Unregisters the mount when dropped
    lease: Option<MountLease>,
    relay: Option<UpstreamRelay>,
    state_tx: watch::Sender<SessionState>,
}

impl StreamingSession {
    pub fn new(mount: MountId, context: SessionContext) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Connected);
        Self {
            mount,
            state: SessionState::Connected,
            context,
            client_alive: CancellationToken::new(),
            lease: None,
            relay: None,
            state_tx,
        }
    }

    pub fn mount(&self) -> &MountId {
        &self.mount
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Token cancelled when the broadcaster disconnects
    pub fn client_alive(&self) -> CancellationToken {
        self.client_alive.clone()
    }

    /// Follow state changes while the session runs
    pub fn watch_state(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Drive the session until the broadcaster disconnects or fails to
    /// authenticate
    pub async fn run<T: InboundTransport>(&mut self, mut transport: T) {
        info!(mount = %self.mount, "Broadcaster connected");
        let mut pending: Option<BoxFuture<'static, AuthOutcome>> = None;

        loop {
            tokio::select! {
                Some(outcome) = OptionFuture::from(pending.as_mut()), if pending.is_some() => {
                    pending = None;
                    if let Some(reason) = self.on_auth_outcome(outcome) {
                        transport.close(POLICY_VIOLATION, reason).await;
                        break;
                    }
                }
                message = transport.recv() => match message {
                    Some(Inbound::Text(text)) => {
                        if let Some(password) = self.on_text(&text) {
                            pending = Some(self.authenticate(password));
                        }
                    }
                    Some(Inbound::Binary(data)) => self.on_binary(data),
                    None => break,
                },
            }
        }

        // Dropping an unfinished authentication cancels it
        drop(pending);
        self.on_disconnect().await;
    }

    /// Returns the password when a `hello` should start authentication
    fn on_text(&mut self, text: &str) -> Option<String> {
        let message = match ControlMessage::parse(text) {
            Ok(message) => message,
            Err(e) => {
                warn!(mount = %self.mount, error = %e, "Ignoring malformed control message");
                return None;
            }
        };

        match (message, self.state) {
            (ControlMessage::Hello { data }, SessionState::Connected) => {
                self.transition(SessionState::Authenticating);
                Some(data.password)
            }
            (ControlMessage::Hello { .. }, state) => {
                debug!(mount = %self.mount, ?state, "Ignoring repeated hello");
                None
            }
            (ControlMessage::Other, _) => None,
        }
    }

    /// Returns a close reason when the session must end
    fn on_auth_outcome(&mut self, outcome: AuthOutcome) -> Option<&'static str> {
        match outcome {
            AuthOutcome::Authorized => {
                info!(mount = %self.mount, "Broadcaster authenticated");
                self.transition(SessionState::Authenticated);
                self.lease = Some(self.context.registry.lease(&self.mount));
                self.start_relay();
                None
            }
            AuthOutcome::Denied => {
                warn!(mount = %self.mount, "Authentication denied, closing connection");
                Some(INVALID_AUTH_REASON)
            }
        }
    }

    fn on_binary(&self, data: Vec<u8>) {
        match &self.relay {
            Some(relay) if relay.is_ready() => {
                relay.send(data);
            }
            _ => debug!(
                mount = %self.mount,
                bytes = data.len(),
                "Dropping audio frame, upstream not ready"
            ),
        }
    }

    async fn on_disconnect(&mut self) {
        self.transition(SessionState::Closed);
        self.client_alive.cancel();
        // The mount is released whether or not this session registered it
        if self.lease.take().is_none() {
            self.context.registry.unregister(&self.mount);
        }
        if let Some(relay) = self.relay.take() {
            relay.close().await;
        }
        info!(mount = %self.mount, "Broadcaster disconnected");
    }

    fn start_relay(&mut self) {
        let mount = self.mount.clone();
        let config = Arc::clone(&self.context.upstream);
        let connector = Arc::clone(&self.context.connector);
        let shutdown = self.client_alive.child_token();
        let relay = match &self.context.relay_events {
            Some(monitor) => {
                UpstreamRelay::spawn_monitored(mount, config, connector, shutdown, monitor.clone())
            }
            None => UpstreamRelay::spawn(mount, config, connector, shutdown),
        };
        self.relay = Some(relay);
    }

    fn authenticate(&self, password: String) -> BoxFuture<'static, AuthOutcome> {
        let authenticator = Arc::clone(&self.context.authenticator);
        let mount = self.mount.clone();
        async move { authenticator.authenticate(&mount, &password).await }.boxed()
    }

    fn transition(&mut self, next: SessionState) {
        debug!(mount = %self.mount, from = ?self.state, to = ?next, "Session state change");
        self.state = next;
        self.state_tx.send_replace(next);
    }
}
