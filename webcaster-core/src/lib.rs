//! webcaster-core: Core library for the webcaster relay
//!
//! This crate provides the transport-independent pieces of the relay that
//! takes audio from browser broadcasters and pushes it to an Icecast server:
//!
//! - **Admission** - [`Gatekeeper`] checks origin, subprotocol and mount
//!   availability before an upgrade is accepted
//! - **Authentication** - [`Authenticator`] trait and [`HttpAuthenticator`]
//!   for the external auth endpoint
//! - **Sessions** - [`StreamingSession`] drives one broadcaster from `hello`
//!   to disconnect
//! - **Upstream** - [`UpstreamRelay`] keeps a `PUT` source connection to
//!   Icecast alive, reconnecting after a fixed delay
//! - **Registry** - [`SessionRegistry`] tracks which mounts are live
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   hello   ┌──────────────────┐  PUT /mount  ┌─────────┐
//! │ Broadcaster  │ ────────▶ │ StreamingSession │ ───────────▶ │ Icecast │
//! │ (WebSocket)  │   audio   │  + UpstreamRelay │   (relay)    │         │
//! └──────────────┘           └────────┬─────────┘              └─────────┘
//!                                     │ POST auth, mount
//!                              ┌──────▼───────┐
//!                              │ Auth service │
//!                              └──────────────┘
//! ```

pub mod auth;
pub mod error;
pub mod gatekeeper;
pub mod mount;
pub mod registry;
pub mod session;
pub mod upstream;

/// `User-Agent` sent to the auth service and the upstream server
pub const USER_AGENT: &str = concat!("webcaster-relay/", env!("CARGO_PKG_VERSION"));

// Re-export key types for convenience
pub use auth::{AuthConfig, AuthError, AuthOutcome, Authenticator, HttpAuthenticator};
pub use error::{RejectionError, UpstreamError};
pub use gatekeeper::{AllowAnyOrigin, AllowedOrigins, Gatekeeper, OriginPolicy, WEBCAST_PROTOCOL};
pub use mount::MountId;
pub use registry::{MountLease, SessionRegistry};
pub use session::{Inbound, InboundTransport, SessionContext, SessionState, StreamingSession};
pub use upstream::{Connector, MountEvent, RelayEvent, TcpConnector, UpstreamConfig, UpstreamRelay};
