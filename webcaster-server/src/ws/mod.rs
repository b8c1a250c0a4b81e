//! WebSocket upgrade handling for broadcasters

mod handler;
mod transport;

pub use handler::relay_handler;
pub use transport::WsTransport;
