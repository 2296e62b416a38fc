//! Service-core callbacks.

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::bridge::{ErrorPayload, ResponseBody};
use crate::bus::message::ServiceRequest;

/// Reporting interface of the hosting service core.
pub trait ServiceCore: Send + Sync {
    /// Report success.
    fn send_response(&self, request: &ServiceRequest, body: ResponseBody);

    /// Report a failure carrying only a message.
    fn send_error_response(&self, request: &ServiceRequest, status: u16, message: String);

    /// Report a failure carrying a structured payload as well.
    fn send_error_response_with_payload(
        &self,
        request: &ServiceRequest,
        status: u16,
        message: String,
        payload: ErrorPayload,
    );
}

/// Which callback produced a `BusResponse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseTag {
    Success,
    Error,
}

/// A service-core callback captured as a value.
#[derive(Debug, Clone, PartialEq)]
pub struct BusResponse {
    pub request_id: Uuid,
    pub channel: String,
    pub status: u16,
    pub body: Option<ResponseBody>,
    pub message: Option<String>,
    pub payload: Option<ErrorPayload>,
}

impl BusResponse {
    pub fn tag(&self) -> ResponseTag {
        if self.body.is_some() {
            ResponseTag::Success
        } else {
            ResponseTag::Error
        }
    }
}

/// `ServiceCore` that forwards every callback over a channel.
#[derive(Debug, Clone)]
pub struct ChannelCore {
    tx: mpsc::UnboundedSender<BusResponse>,
}

impl ChannelCore {
    /// Create a core and the receiver its responses arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<BusResponse>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn forward(&self, response: BusResponse) {
        if self.tx.send(response).is_err() {
            tracing::warn!("Response receiver dropped before bridge reported");
        }
    }
}

impl ServiceCore for ChannelCore {
    fn send_response(&self, request: &ServiceRequest, body: ResponseBody) {
        self.forward(BusResponse {
            request_id: request.id,
            channel: request.channel.clone(),
            status: 200,
            body: Some(body),
            message: None,
            payload: None,
        });
    }

    fn send_error_response(&self, request: &ServiceRequest, status: u16, message: String) {
        self.forward(BusResponse {
            request_id: request.id,
            channel: request.channel.clone(),
            status,
            body: None,
            message: Some(message),
            payload: None,
        });
    }

    fn send_error_response_with_payload(
        &self,
        request: &ServiceRequest,
        status: u16,
        message: String,
        payload: ErrorPayload,
    ) {
        self.forward(BusResponse {
            request_id: request.id,
            channel: request.channel.clone(),
            status,
            body: None,
            message: Some(message),
            payload: Some(payload),
        });
    }
}
