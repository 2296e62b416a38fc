//! Inbound bus messages.

use uuid::Uuid;

use crate::bridge::RequestDescriptor;

/// Default channel the bridge listens on.
pub const REST_SERVICE_CHANNEL: &str = "fabric-rest";

/// Opaque content of a bus request.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Already-typed request from an in-process caller.
    Rest(RequestDescriptor),
    /// Whatever a remote client put on the wire.
    Json(serde_json::Value),
}

impl From<RequestDescriptor> for Payload {
    fn from(descriptor: RequestDescriptor) -> Self {
        Payload::Rest(descriptor)
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::Json(value)
    }
}

/// One request delivered by the bus.
#[derive(Debug, Clone)]
pub struct ServiceRequest {
    /// Correlation id.
    pub id: Uuid,
    pub channel: String,
    pub payload: Payload,
}

impl ServiceRequest {
    /// Create a request with a fresh correlation id.
    pub fn new(channel: impl Into<String>, payload: impl Into<Payload>) -> Self {
        Self::with_id(Uuid::new_v4(), channel, payload)
    }

    pub fn with_id(id: Uuid, channel: impl Into<String>, payload: impl Into<Payload>) -> Self {
        Self {
            id,
            channel: channel.into(),
            payload: payload.into(),
        }
    }
}
