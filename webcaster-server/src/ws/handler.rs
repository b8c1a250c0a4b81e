//! Upgrade handler: gatekeeping, then one streaming session per socket

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::http::header::{ORIGIN, SEC_WEBSOCKET_PROTOCOL};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use tracing::debug;
use webcaster_core::{MountId, StreamingSession, WEBCAST_PROTOCOL};

use super::transport::WsTransport;
use crate::AppState;

/// Handle any request: upgrade accepted broadcasters, refuse everything else
pub async fn relay_handler(
    ws: Option<WebSocketUpgrade>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let Some(ws) = ws else {
        debug!(path = uri.path(), "Refusing non-upgrade request");
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    };

    let mount = MountId::new(uri.path());
    let origin = headers.get(ORIGIN).and_then(|value| value.to_str().ok());
    let protocols = headers
        .get_all(SEC_WEBSOCKET_PROTOCOL)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim);

    if let Err(rejection) = state.gatekeeper.validate(origin, protocols, &mount) {
        return (rejection.status(), rejection.to_string()).into_response();
    }

    ws.protocols([WEBCAST_PROTOCOL])
        .on_upgrade(move |socket| async move {
            let mut session = StreamingSession::new(mount, state.session_context());
            session.run(WsTransport::new(socket)).await;
        })
}
