//! Broadcaster sessions

pub mod protocol;
pub mod state;
pub mod streaming;
pub mod transport;

pub use protocol::{ControlMessage, HelloData};
pub use state::SessionState;
pub use streaming::{SessionContext, StreamingSession};
pub use transport::{INVALID_AUTH_REASON, Inbound, InboundTransport, POLICY_VIOLATION};
