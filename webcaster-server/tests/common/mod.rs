//! Shared test utilities for webcaster-server integration tests
//!
//! Note: Some helpers may appear unused because each test file compiles
//! this module on its own.

pub mod client;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use webcaster_core::upstream::mock::read_request_head;
use tokio::sync::broadcast;
use webcaster_core::{
    AuthConfig, HttpAuthenticator, MountEvent, MountId, RelayEvent, UpstreamConfig,
};
use webcaster_server::{AppState, RelayServer, ServerConfig};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PASSWORD: &str = "hunter2";
pub const CONTINUE: &[u8] = b"HTTP/1.1 100 Continue\r\n\r\n";

/// A relay wired to a mock auth service and a fake Icecast server
pub struct TestRelay {
    pub addr: SocketAddr,
    pub state: Arc<AppState>,
    pub icecast: FakeIcecast,
    /// Held so the auth endpoint outlives the test
    pub auth: MockServer,
}

/// Starts a relay whose auth service accepts [`PASSWORD`] only
#[allow(dead_code)]
pub async fn start_relay() -> TestRelay {
    start_relay_with(|state| state).await
}

/// Like [`start_relay`], letting the test adjust the state first
#[allow(dead_code)]
pub async fn start_relay_with(configure: impl FnOnce(AppState) -> AppState) -> TestRelay {
    let auth = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .and(body_string_contains(format!("auth={PASSWORD}")))
        .respond_with(ResponseTemplate::new(202))
        .mount(&auth)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&auth)
        .await;

    let icecast = FakeIcecast::start().await;
    let authenticator = HttpAuthenticator::new(AuthConfig::new(format!("{}/auth", auth.uri())))
        .expect("auth client");
    let upstream = UpstreamConfig {
        password: "hackme".to_string(),
        ..UpstreamConfig::new("127.0.0.1", icecast.port())
    };
    let state = Arc::new(configure(AppState::new(Arc::new(authenticator), upstream)));

    let addr = spawn_server(Arc::clone(&state)).await;

    TestRelay {
        addr,
        state,
        icecast,
        auth,
    }
}

#[allow(dead_code)]
impl TestRelay {
    /// Accept a source connection, answer `100 Continue` and wait until the
    /// relay has seen it
    pub async fn accept_ready(&self) -> (TcpStream, String) {
        let mut events = self.state.subscribe_relay_events();
        let (mut stream, head) = self.icecast.accept().await;
        stream.write_all(CONTINUE).await.unwrap();
        wait_for_ready(&mut events, &mount_of(&head)).await;
        (stream, head)
    }
}

/// Mount named on the request line of a source request head
#[allow(dead_code)]
pub fn mount_of(head: &str) -> MountId {
    let path = head.split_whitespace().nth(1).expect("request line");
    MountId::new(path)
}

/// Wait for the relay of `mount` to report `100 Continue`
#[allow(dead_code)]
pub async fn wait_for_ready(events: &mut broadcast::Receiver<MountEvent>, mount: &MountId) {
    let ready = async {
        loop {
            let MountEvent { mount: from, event } = events.recv().await.unwrap();
            if &from == mount && matches!(event, RelayEvent::Ready { .. }) {
                return;
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), ready)
        .await
        .expect("relay never became ready");
}

/// Spawns server in background task, returns bound address
async fn spawn_server(state: Arc<AppState>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = RelayServer::new(ServerConfig::new("127.0.0.1", addr.port()), state);
    tokio::spawn(async move {
        let _ = server
            .run_with_listener(listener, std::future::pending())
            .await;
    });

    addr
}

/// Plays the Icecast side of the source protocol
pub struct FakeIcecast {
    listener: TcpListener,
}

#[allow(dead_code)]
impl FakeIcecast {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        Self { listener }
    }

    pub fn port(&self) -> u16 {
        self.listener.local_addr().unwrap().port()
    }

    /// Accept the next source connection and return it with its request head
    pub async fn accept(&self) -> (TcpStream, String) {
        let (mut stream, _) = tokio::time::timeout(Duration::from_secs(5), self.listener.accept())
            .await
            .expect("no upstream connection")
            .unwrap();
        let head = read_request_head(&mut stream).await.unwrap();
        (stream, head)
    }

    /// True if no source connection arrives within `window`
    pub async fn stays_idle(&self, window: Duration) -> bool {
        tokio::time::timeout(window, self.listener.accept())
            .await
            .is_err()
    }
}

/// Poll `condition` until it holds, panicking after a few seconds
#[allow(dead_code)]
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met in time"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
