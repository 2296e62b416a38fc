//! Type-directed decoding of success response bodies.
//!
//! # Responsibilities
//! - Describe how a caller wants the response decoded (`ResponseKind`)
//! - Decode the body into text, bytes, a typed value, or a generic map
//! - Hand decoded typed values back either by value or behind a shared handle
//!
//! # Design Decisions
//! - The hint is supplied by the caller and never inferred from the response
//! - Typed decoding goes through a `ResponseSchema` captured at compile time,
//!   so no runtime type inspection is needed
//! - Generic maps keep the key order of the response

use std::any::{self, Any};
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::bridge::error::{BridgeError, BridgeResult};

/// A decoded typed response value behind a trait object.
pub trait TypedBody: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn clone_boxed(&self) -> Box<dyn TypedBody>;

    /// Value equality across trait objects; false when the types differ.
    fn eq_dyn(&self, other: &dyn TypedBody) -> bool;

    fn to_json(&self) -> Result<Value, serde_json::Error>;
}

impl<T> TypedBody for T
where
    T: Clone + PartialEq + fmt::Debug + Serialize + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_boxed(&self) -> Box<dyn TypedBody> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn TypedBody) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| other == self)
    }

    fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

type DecodeFn = fn(&[u8]) -> Result<Box<dyn TypedBody>, serde_json::Error>;

fn decode_as<T>(body: &[u8]) -> Result<Box<dyn TypedBody>, serde_json::Error>
where
    T: DeserializeOwned + TypedBody,
{
    let value: T = serde_json::from_slice(body)?;
    Ok(Box::new(value))
}

/// Handle to a concrete response type.
#[derive(Clone, Copy)]
pub struct ResponseSchema {
    type_name: &'static str,
    decode: DecodeFn,
}

impl ResponseSchema {
    /// Schema for decoding into `T`.
    pub fn of<T>() -> Self
    where
        T: DeserializeOwned + Clone + PartialEq + fmt::Debug + Serialize + Send + Sync + 'static,
    {
        Self {
            type_name: any::type_name::<T>(),
            decode: decode_as::<T>,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn decode(&self, body: &[u8]) -> Result<Box<dyn TypedBody>, serde_json::Error> {
        (self.decode)(body)
    }
}

impl fmt::Debug for ResponseSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseSchema")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Caller-declared instruction for decoding a success response.
#[derive(Debug, Clone, Copy, Default)]
pub enum ResponseKind {
    /// No hint: decode JSON into a generic ordered map.
    #[default]
    Untyped,
    /// Read the whole body as text.
    Text,
    /// Return the raw body bytes.
    Bytes,
    /// Decode JSON into the schema's type.
    Typed {
        schema: ResponseSchema,
        /// Return a shared handle instead of an owned value.
        by_reference: bool,
    },
}

impl ResponseKind {
    /// Decode into `T`, returned by value.
    pub fn typed<T>() -> Self
    where
        T: DeserializeOwned + Clone + PartialEq + fmt::Debug + Serialize + Send + Sync + 'static,
    {
        ResponseKind::Typed {
            schema: ResponseSchema::of::<T>(),
            by_reference: false,
        }
    }

    /// Decode into `T`, returned behind an `Arc`.
    pub fn typed_ref<T>() -> Self
    where
        T: DeserializeOwned + Clone + PartialEq + fmt::Debug + Serialize + Send + Sync + 'static,
    {
        ResponseKind::Typed {
            schema: ResponseSchema::of::<T>(),
            by_reference: true,
        }
    }

    /// Label used in logs.
    pub fn describe(&self) -> &'static str {
        match self {
            ResponseKind::Untyped => "map",
            ResponseKind::Text => "text",
            ResponseKind::Bytes => "bytes",
            ResponseKind::Typed { schema, .. } => schema.type_name(),
        }
    }
}

/// An owned typed value.
pub struct TypedValue(Box<dyn TypedBody>);

impl TypedValue {
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Take the concrete value out, if it is a `T`.
    pub fn into_inner<T: 'static>(self) -> Option<T> {
        self.0.into_any().downcast::<T>().ok().map(|boxed| *boxed)
    }

    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        self.0.to_json()
    }
}

impl Clone for TypedValue {
    fn clone(&self) -> Self {
        TypedValue(self.0.clone_boxed())
    }
}

impl PartialEq for TypedValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_dyn(other.0.as_ref())
    }
}

impl fmt::Debug for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

/// A decoded success response body.
#[derive(Debug, Clone)]
pub enum ResponseBody {
    Text(String),
    Bytes(Bytes),
    Map(Map<String, Value>),
    Value(TypedValue),
    Reference(Arc<dyn TypedBody>),
}

impl ResponseBody {
    /// Borrow the typed value, whether owned or shared.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            ResponseBody::Value(value) => value.downcast_ref::<T>(),
            ResponseBody::Reference(shared) => shared.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// JSON rendering for transports that carry JSON.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        match self {
            ResponseBody::Text(text) => Ok(Value::String(text.clone())),
            ResponseBody::Bytes(bytes) => serde_json::to_value(bytes.as_ref()),
            ResponseBody::Map(map) => Ok(Value::Object(map.clone())),
            ResponseBody::Value(value) => value.to_json(),
            ResponseBody::Reference(shared) => shared.to_json(),
        }
    }
}

// Shared handles compare by pointee so two decodes of the same bytes are equal.
impl PartialEq for ResponseBody {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ResponseBody::Text(a), ResponseBody::Text(b)) => a == b,
            (ResponseBody::Bytes(a), ResponseBody::Bytes(b)) => a == b,
            (ResponseBody::Map(a), ResponseBody::Map(b)) => a == b,
            (ResponseBody::Value(a), ResponseBody::Value(b)) => a == b,
            (ResponseBody::Reference(a), ResponseBody::Reference(b)) => a.eq_dyn(b.as_ref()),
            _ => false,
        }
    }
}

/// Decode a fully read success body according to `kind`.
pub fn decode(body: Bytes, kind: &ResponseKind) -> BridgeResult<ResponseBody> {
    match kind {
        ResponseKind::Text => String::from_utf8(body.to_vec())
            .map(ResponseBody::Text)
            .map_err(|e| BridgeError::Decode(e.to_string())),
        ResponseKind::Bytes => Ok(ResponseBody::Bytes(body)),
        ResponseKind::Typed { schema, by_reference } => {
            let value = schema
                .decode(&body)
                .map_err(|e| BridgeError::Decode(e.to_string()))?;
            if *by_reference {
                Ok(ResponseBody::Reference(Arc::from(value)))
            } else {
                Ok(ResponseBody::Value(TypedValue(value)))
            }
        }
        ResponseKind::Untyped => {
            // A literal `null` decodes to an empty map
            let map: Option<Map<String, Value>> =
                serde_json::from_slice(&body).map_err(|e| BridgeError::Decode(e.to_string()))?;
            Ok(ResponseBody::Map(map.unwrap_or_default()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Widget {
        id: u32,
        label: String,
    }

    #[test]
    fn test_untyped_decodes_to_map() {
        let decoded = decode(Bytes::from_static(br#"{"a":1}"#), &ResponseKind::Untyped).unwrap();
        let mut expected = Map::new();
        expected.insert("a".to_string(), json!(1));
        assert_eq!(decoded, ResponseBody::Map(expected));
    }

    #[test]
    fn test_untyped_preserves_key_order() {
        let decoded =
            decode(Bytes::from_static(br#"{"z":1,"a":2,"m":3}"#), &ResponseKind::Untyped).unwrap();
        let ResponseBody::Map(map) = decoded else {
            panic!("expected map");
        };
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_untyped_rejects_non_object() {
        let err = decode(Bytes::from_static(b"[1,2]"), &ResponseKind::Untyped).unwrap_err();
        assert!(matches!(err, BridgeError::Decode(_)));

        let err = decode(Bytes::from_static(b"not json"), &ResponseKind::Untyped).unwrap_err();
        assert!(matches!(err, BridgeError::Decode(_)));
    }

    #[test]
    fn test_text_and_bytes() {
        let decoded = decode(Bytes::from_static(b"hello"), &ResponseKind::Text).unwrap();
        assert_eq!(decoded, ResponseBody::Text("hello".into()));

        let raw = Bytes::from_static(&[1, 2, 255]);
        let decoded = decode(raw.clone(), &ResponseKind::Bytes).unwrap();
        assert_eq!(decoded, ResponseBody::Bytes(raw));
    }

    #[test]
    fn test_text_rejects_invalid_utf8() {
        let err = decode(Bytes::from_static(&[0xff, 0xfe]), &ResponseKind::Text).unwrap_err();
        assert!(matches!(err, BridgeError::Decode(_)));
    }

    #[test]
    fn test_typed_by_value() {
        let body = Bytes::from_static(br#"{"id":7,"label":"gear"}"#);
        let decoded = decode(body, &ResponseKind::typed::<Widget>()).unwrap();

        let ResponseBody::Value(value) = decoded else {
            panic!("expected owned value");
        };
        assert_eq!(value.downcast_ref::<String>(), None);
        let widget = value.into_inner::<Widget>().unwrap();
        assert_eq!(widget, Widget { id: 7, label: "gear".into() });
    }

    #[test]
    fn test_typed_by_reference() {
        let body = Bytes::from_static(br#"{"id":7,"label":"gear"}"#);
        let decoded = decode(body.clone(), &ResponseKind::typed_ref::<Widget>()).unwrap();
        assert!(matches!(decoded, ResponseBody::Reference(_)));
        assert_eq!(decoded.downcast_ref::<Widget>().unwrap().id, 7);

        // Two decodes of the same bytes compare equal
        let again = decode(body, &ResponseKind::typed_ref::<Widget>()).unwrap();
        assert_eq!(decoded, again);
    }

    #[test]
    fn test_typed_schema_mismatch() {
        let body = Bytes::from_static(br#"{"id":"seven"}"#);
        let err = decode(body, &ResponseKind::typed::<Widget>()).unwrap_err();
        assert!(matches!(err, BridgeError::Decode(_)));
    }

    #[test]
    fn test_to_json() {
        let decoded = decode(
            Bytes::from_static(br#"{"id":1,"label":"x"}"#),
            &ResponseKind::typed::<Widget>(),
        )
        .unwrap();
        assert_eq!(decoded.to_json().unwrap(), json!({"id": 1, "label": "x"}));
        assert_eq!(ResponseBody::Text("t".into()).to_json().unwrap(), json!("t"));
    }
}
