//! Request descriptors and payload normalization.
//!
//! # Responsibilities
//! - Define the canonical `RequestDescriptor`
//! - Accept the legacy cross-language wire shape (`uri`, `method`, `apiClass`)
//! - Resolve an opaque bus payload into a descriptor
//!
//! # Design Decisions
//! - Native shape is probed first, legacy second; nothing else is tried
//! - Any malformed legacy field rejects the whole payload (no partial descriptors)
//! - The response-kind hint is fixed at construction

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Deserialize;

use crate::bridge::body::RequestBody;
use crate::bridge::error::{BridgeError, BridgeResult};
use crate::bridge::response::ResponseKind;
use crate::bus::Payload;

/// `apiClass` value legacy clients send when they want the body as a plain string.
pub const PLAIN_STRING_API_CLASS: &str = "java.lang.String";

/// Canonical description of one outbound HTTP call.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    url: String,
    http_method: String,
    body: RequestBody,
    headers: BTreeMap<String, String>,
    response_kind: ResponseKind,
}

impl RequestDescriptor {
    /// Create a descriptor with no headers, a `null` body, and no response hint.
    pub fn new(http_method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http_method: http_method.into(),
            body: RequestBody::default(),
            headers: BTreeMap::new(),
            response_kind: ResponseKind::default(),
        }
    }

    pub fn with_body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_response_kind(mut self, kind: ResponseKind) -> Self {
        self.response_kind = kind;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn http_method(&self) -> &str {
        &self.http_method
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn response_kind(&self) -> &ResponseKind {
        &self.response_kind
    }
}

/// Request shape produced by cross-language clients.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyRequestDescriptor {
    pub uri: String,
    pub method: String,
    #[serde(default)]
    pub body: serde_json::Value,
    #[serde(default)]
    pub api_class: Option<String>,
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
}

impl From<LegacyRequestDescriptor> for RequestDescriptor {
    fn from(legacy: LegacyRequestDescriptor) -> Self {
        let response_kind = match legacy.api_class.as_deref() {
            Some(PLAIN_STRING_API_CLASS) => ResponseKind::Text,
            _ => ResponseKind::Untyped,
        };

        RequestDescriptor::new(legacy.method, legacy.uri)
            .with_body(RequestBody::Json(legacy.body))
            .with_headers(legacy.headers.unwrap_or_default())
            .with_response_kind(response_kind)
    }
}

/// Resolve a bus payload into a request descriptor.
///
/// Native descriptors are borrowed unchanged; legacy maps are converted.
pub fn normalize(payload: &Payload) -> BridgeResult<Cow<'_, RequestDescriptor>> {
    match payload {
        Payload::Rest(descriptor) => Ok(Cow::Borrowed(descriptor)),
        Payload::Json(value @ serde_json::Value::Object(_)) => {
            LegacyRequestDescriptor::deserialize(value)
                .map(|legacy| Cow::Owned(legacy.into()))
                .map_err(|e| {
                    tracing::debug!(error = %e, "Payload is not a legacy request descriptor");
                    BridgeError::InvalidPayload
                })
        }
        Payload::Json(_) => Err(BridgeError::InvalidPayload),
    }
}
