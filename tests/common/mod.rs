//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, Response, StatusCode},
    routing::post,
    Router,
};
use tokio::net::TcpListener;

use ise_proxy::{HttpServer, ProxyConfig, Shutdown};

pub const TOKEN: &str = "secret";
pub const APP_ID: &str = "app-123";
pub const API_KEY: &str = "api-key";

/// A request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub headers: HeaderMap,
    pub body: String,
}

/// Canned reply for the mock upstream.
#[derive(Clone)]
pub struct MockReply {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: &'static str,
    pub delay: Duration,
}

impl MockReply {
    pub fn json(body: &'static str) -> Self {
        Self {
            status: 200,
            content_type: Some("application/json"),
            body,
            delay: Duration::ZERO,
        }
    }
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

/// Mock ISE endpoint listening on an ephemeral port.
pub struct MockUpstream {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockUpstream {
    pub fn url(&self) -> String {
        format!("http://{}/v1/service/v2/ise", self.addr)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

async fn mock_handler(State(state): State<MockState>, headers: HeaderMap, body: Bytes) -> Response<Body> {
    state.calls.lock().unwrap().push(RecordedCall {
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    tokio::time::sleep(state.reply.delay).await;

    let mut builder = Response::builder().status(StatusCode::from_u16(state.reply.status).unwrap());
    if let Some(content_type) = state.reply.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(Body::from(state.reply.body)).unwrap()
}

/// Start a mock upstream that answers every POST with `reply`.
pub async fn start_mock_upstream(reply: MockReply) -> MockUpstream {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        reply,
        calls: calls.clone(),
    };
    let app = Router::new()
        .route("/v1/service/v2/ise", post(mock_handler))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, calls }
}

/// An address with nothing listening on it.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v1/service/v2/ise", addr)
}

/// Proxy config with test credentials pointing at `upstream_url`.
pub fn test_config(upstream_url: String) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.upstream.url = upstream_url;
    config.upstream.app_id = APP_ID.into();
    config.upstream.api_key = API_KEY.into();
    config.auth.token = TOKEN.into();
    config
}

/// A running proxy; shuts down when dropped.
pub struct RunningProxy {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl RunningProxy {
    pub fn ise_url(&self) -> String {
        format!("http://{}/iflytek/ise", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the proxy on an ephemeral port.
pub async fn start_proxy(config: ProxyConfig) -> RunningProxy {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    RunningProxy { addr, shutdown }
}

/// HTTP client that bypasses any system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
