//! Shared application state for the relay server

use std::sync::Arc;

use tokio::sync::broadcast;
use webcaster_core::{
    Authenticator, Connector, Gatekeeper, MountEvent, OriginPolicy, SessionContext,
    SessionRegistry, TcpConnector, UpstreamConfig,
};

const RELAY_EVENT_CAPACITY: usize = 256;

/// Shared application state accessible by all handlers
pub struct AppState {
    /// Mounts with an authenticated broadcaster
    pub registry: SessionRegistry,
    /// Admission checks run before an upgrade is accepted
    pub gatekeeper: Gatekeeper,
    pub authenticator: Arc<dyn Authenticator>,
    /// Icecast settings shared by every relay
    pub upstream: Arc<UpstreamConfig>,
    pub connector: Arc<dyn Connector>,
    /// Lifecycle events of every upstream relay, tagged by mount
    pub relay_events: broadcast::Sender<MountEvent>,
}

impl AppState {
    /// Create state that admits any origin and dials upstream over TCP
    pub fn new(authenticator: Arc<dyn Authenticator>, upstream: UpstreamConfig) -> Self {
        let registry = SessionRegistry::new();
        let (relay_events, _) = broadcast::channel(RELAY_EVENT_CAPACITY);
        Self {
            gatekeeper: Gatekeeper::new(registry.clone()),
            registry,
            authenticator,
            upstream: Arc::new(upstream),
            connector: Arc::new(TcpConnector),
            relay_events,
        }
    }

    /// Replace the origin policy used by the gatekeeper
    #[must_use]
    pub fn with_origin_policy(mut self, policy: impl OriginPolicy + 'static) -> Self {
        self.gatekeeper = self.gatekeeper.with_origin_policy(policy);
        self
    }

    /// Replace how upstream connections are made
    #[must_use]
    pub fn with_connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = connector;
        self
    }

    /// Collaborators for a new streaming session
    pub fn session_context(&self) -> SessionContext {
        SessionContext {
            registry: self.registry.clone(),
            authenticator: Arc::clone(&self.authenticator),
            upstream: Arc::clone(&self.upstream),
            connector: Arc::clone(&self.connector),
            relay_events: Some(self.relay_events.clone()),
        }
    }

    /// Follow relay lifecycle events across all sessions
    pub fn subscribe_relay_events(&self) -> broadcast::Receiver<MountEvent> {
        self.relay_events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webcaster_core::auth::mock::StaticAuthenticator;
    use webcaster_core::{AllowedOrigins, MountId, RejectionError, RelayEvent};

    fn state() -> AppState {
        AppState::new(
            Arc::new(StaticAuthenticator::new("hunter2")),
            UpstreamConfig::new("icecast.local", 8000),
        )
    }

    #[test]
    fn gatekeeper_shares_the_registry() {
        let state = state();
        let mount = MountId::new("/show1");
        state.registry.register(&mount);

        let result = state.gatekeeper.validate(None, ["webcast"], &mount);
        assert!(matches!(result, Err(RejectionError::MountInUse { .. })));
    }

    #[test]
    fn origin_policy_can_be_replaced() {
        let state = state().with_origin_policy(AllowedOrigins::new(["https://studio.example"]));
        let mount = MountId::new("/show1");

        assert!(
            state
                .gatekeeper
                .validate(Some("https://studio.example"), ["webcast"], &mount)
                .is_ok()
        );
        assert!(
            state
                .gatekeeper
                .validate(Some("https://evil.example"), ["webcast"], &mount)
                .is_err()
        );
    }

    #[test]
    fn session_context_shares_components() {
        let state = state();
        let context = state.session_context();

        context.registry.register(&MountId::new("/show1"));
        assert_eq!(state.registry.len(), 1);
        assert_eq!(context.upstream.host, "icecast.local");
    }

    #[test]
    fn session_context_publishes_to_server_relay_events() {
        let state = state();
        let mut events = state.subscribe_relay_events();
        let context = state.session_context();

        let event = MountEvent {
            mount: MountId::new("/show1"),
            event: RelayEvent::Stopped,
        };
        context.relay_events.unwrap().send(event.clone()).unwrap();

        assert_eq!(events.try_recv().unwrap(), event);
    }
}
