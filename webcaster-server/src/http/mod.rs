//! HTTP routing
//!
//! The relay has no REST surface: every path is a potential mount, so all
//! requests fall through to the WebSocket handler, which answers anything
//! that is not an upgrade with `405`.

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::ws::relay_handler;

/// Create the router with every path routed to the relay handler
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(relay_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
