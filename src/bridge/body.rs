//! Outbound request bodies.
//!
//! # Encoding Order
//! 1. `Text`, and a JSON string value, is sent as its raw UTF-8 bytes
//!    (no quoting, no escaping)
//! 2. `Bytes` is sent unchanged
//! 3. Everything else is serialized as JSON
//!
//! Callers that pre-serialized a payload must not be double-encoded, so the
//! order above is part of the contract.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;

use crate::bridge::error::{BridgeError, BridgeResult};

/// A value that can be serialized to JSON behind a trait object.
pub trait JsonBody: fmt::Debug + Send + Sync {
    /// Serialize the value into JSON bytes.
    fn to_json_vec(&self) -> Result<Vec<u8>, serde_json::Error>;
}

impl<T> JsonBody for T
where
    T: Serialize + fmt::Debug + Send + Sync,
{
    fn to_json_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Body of an outbound request.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Pre-built text, sent as is.
    Text(String),
    /// Raw bytes, sent as is.
    Bytes(Bytes),
    /// A dynamic JSON value (what legacy payloads carry).
    Json(serde_json::Value),
    /// Any serializable Rust value.
    Serializable(Arc<dyn JsonBody>),
}

impl RequestBody {
    /// Wrap a serializable value.
    pub fn serializable<T>(value: T) -> Self
    where
        T: Serialize + fmt::Debug + Send + Sync + 'static,
    {
        RequestBody::Serializable(Arc::new(value))
    }

    /// Produce the bytes to put on the wire.
    pub fn encode(&self) -> BridgeResult<Bytes> {
        match self {
            RequestBody::Text(text) => Ok(Bytes::copy_from_slice(text.as_bytes())),
            RequestBody::Bytes(bytes) => Ok(bytes.clone()),
            RequestBody::Json(serde_json::Value::String(text)) => {
                Ok(Bytes::copy_from_slice(text.as_bytes()))
            }
            RequestBody::Json(value) => serde_json::to_vec(value)
                .map(Bytes::from)
                .map_err(|e| BridgeError::BodyEncode(e.to_string())),
            RequestBody::Serializable(value) => value
                .to_json_vec()
                .map(Bytes::from)
                .map_err(|e| BridgeError::BodyEncode(e.to_string())),
        }
    }
}

/// An absent body is JSON `null`.
impl Default for RequestBody {
    fn default() -> Self {
        RequestBody::Json(serde_json::Value::Null)
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_string())
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        RequestBody::Bytes(bytes)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Bytes(Bytes::from(bytes))
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        RequestBody::Json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_text_is_not_quoted() {
        let body = RequestBody::from(r#"{"already":"json"}"#);
        assert_eq!(body.encode().unwrap(), Bytes::from_static(br#"{"already":"json"}"#));

        let body = RequestBody::from("plain \"text\"\n");
        assert_eq!(body.encode().unwrap(), Bytes::from_static(b"plain \"text\"\n"));
    }

    #[test]
    fn test_json_string_is_sent_raw() {
        let body = RequestBody::from(json!("plain text"));
        assert_eq!(body.encode().unwrap(), Bytes::from_static(b"plain text"));

        let body = RequestBody::from(json!(r#"{"pre":"built"}"#));
        assert_eq!(body.encode().unwrap(), Bytes::from_static(br#"{"pre":"built"}"#));
    }

    #[test]
    fn test_bytes_are_unchanged() {
        let raw = vec![0u8, 159, 146, 150, 255];
        let body = RequestBody::from(raw.clone());
        assert_eq!(body.encode().unwrap().to_vec(), raw);
    }

    #[test]
    fn test_structured_values_are_json() {
        let value = json!({"name": "box", "size": [1, 2]});
        let body = RequestBody::from(value.clone());
        assert_eq!(body.encode().unwrap().to_vec(), serde_json::to_vec(&value).unwrap());

        #[derive(Debug, Serialize)]
        struct Patch {
            enabled: bool,
        }
        let body = RequestBody::serializable(Patch { enabled: true });
        assert_eq!(body.encode().unwrap(), Bytes::from_static(br#"{"enabled":true}"#));
    }

    #[test]
    fn test_missing_body_is_null() {
        assert_eq!(RequestBody::default().encode().unwrap(), Bytes::from_static(b"null"));
    }

    #[test]
    fn test_unserializable_value() {
        // JSON object keys must be strings
        let mut map = BTreeMap::new();
        map.insert((1u8, 2u8), "pair");
        let body = RequestBody::serializable(map);

        match body.encode() {
            Err(BridgeError::BodyEncode(msg)) => assert!(msg.contains("key must be a string")),
            other => panic!("expected encode failure, got {:?}", other),
        }
    }
}
