//! Local HTTP ingress for the bridge channel.
//!
//! # Responsibilities
//! - Create Axum Router with the bus and health handlers
//! - Wire up middleware (tracing, timeout)
//! - Turn `POST /bus/{channel}` into a bus request for the bridge
//! - Render the reported `BusResponse` as JSON
//!
//! # Design Decisions
//! - Bodies arrive as JSON, so every payload goes through the legacy probe
//! - Unparseable bodies are handed to the bridge as opaque text and rejected there
//! - The HTTP status mirrors the status the bridge reported

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::bridge::RestBridge;
use crate::bus::{BusResponse, ChannelCore, Payload, ServiceRequest};
use crate::config::BridgeConfig;
use crate::http::client::HttpClient;
use crate::http::request::{request_id, X_REQUEST_ID};

/// Application state injected into handlers.
pub struct AppState<C> {
    pub bridge: Arc<RestBridge<C>>,
    pub channel: Arc<str>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            bridge: Arc::clone(&self.bridge),
            channel: Arc::clone(&self.channel),
        }
    }
}

/// HTTP ingress for the bridge.
pub struct HttpServer {
    router: Router,
    config: BridgeConfig,
}

impl HttpServer {
    /// Create an ingress serving `bridge` on the configured channel.
    pub fn new<C: HttpClient + 'static>(config: BridgeConfig, bridge: Arc<RestBridge<C>>) -> Self {
        let state = AppState {
            bridge,
            channel: Arc::from(config.bridge.channel.as_str()),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router<C: HttpClient + 'static>(config: &BridgeConfig, state: AppState<C>) -> Router {
        Router::new()
            .route("/bus/{channel}", post(bus_handler::<C>))
            .route("/health", get(health_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Router for in-process use (tests, embedding).
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            channel = %self.config.bridge.channel,
            "HTTP ingress starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP ingress stopped");
        Ok(())
    }
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn bus_handler<C: HttpClient + 'static>(
    State(state): State<AppState<C>>,
    Path(channel): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = request_id(&headers);

    if channel != *state.channel {
        tracing::warn!(request_id = %request_id, channel = %channel, "Unknown bus channel");
        return (StatusCode::NOT_FOUND, format!("no service on channel '{}'", channel))
            .into_response();
    }

    let payload = match serde_json::from_slice::<Value>(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(request_id = %request_id, error = %e, "Bus payload is not JSON");
            Value::String(String::from_utf8_lossy(&body).into_owned())
        }
    };

    let request = ServiceRequest::with_id(request_id, channel, Payload::Json(payload));
    let (core, mut responses) = ChannelCore::new();
    state.bridge.handle_request(&request, &core).await;

    match responses.try_recv() {
        Ok(response) => render(response),
        Err(_) => {
            tracing::error!(request_id = %request_id, "Bridge reported no response");
            (StatusCode::INTERNAL_SERVER_ERROR, "no response reported").into_response()
        }
    }
}

fn render(response: BusResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let envelope = match &response.body {
        Some(body) => match body.to_json() {
            Ok(body) => json!({
                "requestId": response.request_id,
                "channel": response.channel,
                "body": body,
            }),
            Err(e) => {
                tracing::error!(request_id = %response.request_id, error = %e, "Failed to render response body");
                return (StatusCode::INTERNAL_SERVER_ERROR, "cannot render response body")
                    .into_response();
            }
        },
        None => json!({
            "requestId": response.request_id,
            "channel": response.channel,
            "message": response.message,
            "payload": response.payload,
        }),
    };

    let mut rendered = (status, Json(envelope)).into_response();
    if let Ok(value) = HeaderValue::from_str(&response.request_id.to_string()) {
        rendered.headers_mut().insert(X_REQUEST_ID, value);
    }
    rendered
}
