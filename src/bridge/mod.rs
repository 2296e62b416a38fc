//! REST bridge: turns bus requests describing HTTP calls into real calls.
//!
//! # Data Flow
//! ```text
//! ServiceRequest.payload
//!     → request.rs (normalize native / legacy shape)
//!     → body.rs (encode body bytes)
//!     → invoker.rs (host rewrite, headers, one call via HttpClient)
//!     → status >= 300: remote error with original status + payload
//!     → status < 300: response.rs (decode per response-kind hint)
//!     → outcome.rs (exactly one ServiceCore callback)
//! ```
//!
//! # Design Decisions
//! - One outbound attempt per request; no retries or backoff
//! - The host override is captured at construction and never mutated
//! - Every response body is consumed or dropped on every branch

pub mod body;
pub mod error;
pub mod invoker;
pub mod outcome;
pub mod request;
pub mod response;

use std::time::Instant;

use http::header::CONTENT_TYPE;
use http::StatusCode;

use crate::bus::{Payload, ServiceCore, ServiceRequest};
use crate::http::{HttpClient, HttpResponse};
use crate::observability::metrics;

pub use body::{JsonBody, RequestBody};
pub use error::{BridgeError, BridgeResult};
pub use outcome::{ErrorPayload, Outcome};
pub use request::{normalize, LegacyRequestDescriptor, RequestDescriptor, PLAIN_STRING_API_CLASS};
pub use response::{ResponseBody, ResponseKind, ResponseSchema, TypedBody, TypedValue};

/// Bridge between bus requests and outbound HTTP calls.
pub struct RestBridge<C> {
    client: C,
    base_host: Option<String>,
}

impl<C: HttpClient> RestBridge<C> {
    /// Create a bridge that calls destination URLs as given.
    pub fn new(client: C) -> Self {
        Self {
            client,
            base_host: None,
        }
    }

    /// Create a bridge that rewrites every URL's authority to `base_host`.
    ///
    /// An empty override is treated as no override.
    pub fn with_base_host(client: C, base_host: Option<String>) -> Self {
        Self {
            client,
            base_host: base_host.filter(|host| !host.is_empty()),
        }
    }

    pub fn base_host(&self) -> Option<&str> {
        self.base_host.as_deref()
    }

    /// Handle one bus request and report the result to `core`.
    pub async fn handle_request(&self, request: &ServiceRequest, core: &dyn ServiceCore) -> Outcome {
        let start_time = Instant::now();
        let result = self.execute(&request.payload).await;

        match &result {
            Ok((status, _)) => {
                tracing::debug!(
                    request_id = %request.id,
                    channel = %request.channel,
                    status = *status,
                    "REST bridge request succeeded"
                );
                metrics::record_outcome("success", *status, start_time);
            }
            Err(e) => {
                tracing::warn!(
                    request_id = %request.id,
                    channel = %request.channel,
                    kind = e.kind(),
                    status = e.status_code(),
                    error = %e,
                    "REST bridge request failed"
                );
                metrics::record_outcome(e.kind(), e.status_code(), start_time);
            }
        }

        let outcome = Outcome::from(result);
        outcome.report(request, core);
        outcome
    }

    /// Run the pipeline for `payload` without reporting.
    pub async fn process(&self, payload: &Payload) -> Outcome {
        Outcome::from(self.execute(payload).await)
    }

    async fn execute(&self, payload: &Payload) -> BridgeResult<(u16, ResponseBody)> {
        let descriptor = normalize(payload)?;
        let body = descriptor.body().encode()?;

        let url = invoker::resolve_url(descriptor.url(), self.base_host());
        tracing::debug!(
            method = %descriptor.http_method(),
            url = %url,
            response_kind = descriptor.response_kind().describe(),
            "Invoking REST endpoint"
        );

        let request = invoker::build_request(&descriptor, &url, body)?;
        let response = invoker::invoke(&self.client, request).await?;

        let status = response.status();
        if status.as_u16() >= 300 {
            return Err(remote_error(status, response).await);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = response
            .body()
            .await
            .map_err(|e| BridgeError::Transport(e.to_string()))?;
        let decoded = response::decode(bytes, descriptor.response_kind()).inspect_err(|e| {
            tracing::debug!(
                content_type = content_type.as_deref().unwrap_or("-"),
                response_kind = descriptor.response_kind().describe(),
                error = %e,
                "Response body did not match the requested kind"
            );
        })?;

        Ok((status.as_u16(), decoded))
    }
}

/// Drain a failed response and build the remote error from its body text,
/// falling back to the status line.
async fn remote_error<R: HttpResponse>(status: StatusCode, response: R) -> BridgeError {
    let text = match response.body().await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
        Err(e) => {
            tracing::debug!(error = %e, "Failed to read error response body");
            String::new()
        }
    };

    let detail = if text.is_empty() {
        status_line(status)
    } else {
        text
    };

    BridgeError::Remote { status, detail }
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
