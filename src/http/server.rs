//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the health and ISE handlers
//! - Wire up middleware (tracing, timeout, body limit, request ID, auth)
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::ise::{HttpUpstream, ProxyError, SigningProxy, UpstreamClient};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::security::{require_plugin_token, Authenticator};

pub const ISE_ROUTE: &str = "/iflytek/ise";
pub const HEALTH_ROUTE: &str = "/health";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<SigningProxy>,
}

/// HTTP server for the ISE proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a server that talks to the configured upstream over HTTP.
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let upstream = HttpUpstream::new(
            config.upstream.url.clone(),
            Duration::from_secs(config.upstream.timeout_secs),
        )?;
        Ok(Self::with_upstream(config, Arc::new(upstream)))
    }

    /// Create a server with an injected upstream client.
    pub fn with_upstream(config: ProxyConfig, upstream: Arc<dyn UpstreamClient>) -> Self {
        let state = AppState {
            proxy: Arc::new(SigningProxy::from_config(&config, upstream)),
        };
        let authenticator = Authenticator::new(&config.auth.token);

        let router = Self::build_router(&config, state, authenticator);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState, authenticator: Authenticator) -> Router {
        let ise = post(ise_handler).route_layer(middleware::from_fn_with_state(
            authenticator,
            require_plugin_token,
        ));

        Router::new()
            .route(HEALTH_ROUTE, get(health_handler))
            .route(ISE_ROUTE, ise)
            .with_state(state)
            .layer(body_limit(config))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The assembled router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(Shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /iflytek/ise`. Runs behind `require_plugin_token`.
async fn ise_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);

    let result = match body {
        Ok(bytes) => state.proxy.handle(&bytes).await,
        Err(rejection) => Err(body_error(rejection)),
    };

    let response = match result {
        Ok(upstream) => upstream.into_response(),
        Err(e) => {
            tracing::debug!(request_id = %request_id, error = %e, "Request rejected");
            e.into_response()
        }
    };

    let status = response.status();
    tracing::info!(
        request_id = %request_id,
        status = status.as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "ISE request completed"
    );
    metrics::record_request(ISE_ROUTE, status.as_u16(), start);
    response
}

// Without a configured cap, axum's 2 MB default is lifted too.
fn body_limit(config: &ProxyConfig) -> DefaultBodyLimit {
    match config.limits.body_limit() {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    }
}

fn body_error(rejection: BytesRejection) -> ProxyError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ProxyError::BodyTooLarge
    } else {
        ProxyError::InvalidJson
    }
}
