//! Upstream (Icecast) source connection with automatic reconnect

pub mod config;
mod connection;
pub mod connector;
pub mod handshake;
pub mod mock;
pub mod reconnect;
pub mod relay;
pub mod state;

pub use config::UpstreamConfig;
pub use connector::{BoxedStream, Connector, TcpConnector, UpstreamStream};
pub use handshake::{CONTINUE_MARKER, ContinueDetector, request_head};
pub use reconnect::ReconnectPolicy;
pub use relay::UpstreamRelay;
pub use state::{MountEvent, RelayEvent};
