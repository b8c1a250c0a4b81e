//! Upstream relay lifecycle events

use std::time::Duration;

use crate::mount::MountId;

/// Events emitted by an upstream relay
///
/// `attempt` counts connect attempts from 1 over the relay's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// A connect attempt started
    Connecting { attempt: u32 },
    /// Transport is up and the handshake was written
    Connected { attempt: u32 },
    /// `100 Continue` observed; audio now flows
    Ready { attempt: u32 },
    /// Connection failed or was lost
    Disconnected { attempt: u32, reason: String },
    /// Next attempt scheduled after `delay`
    Reconnecting { delay: Duration },
    /// Relay ended for good
    Stopped,
}

/// A [`RelayEvent`] tagged with the mount whose relay emitted it
///
/// Published on a channel shared by every relay of a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEvent {
    pub mount: MountId,
    pub event: RelayEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_event_equality_includes_fields() {
        assert_eq!(
            RelayEvent::Connecting { attempt: 1 },
            RelayEvent::Connecting { attempt: 1 }
        );
        assert_ne!(
            RelayEvent::Connecting { attempt: 1 },
            RelayEvent::Connecting { attempt: 2 }
        );
    }
}
