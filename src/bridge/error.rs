//! Failure taxonomy for one bridge invocation.

use http::StatusCode;
use thiserror::Error;

/// Errors that can end a bridge invocation.
///
/// Each variant maps onto exactly one error callback of the service core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// Payload matched neither the native nor the legacy request shape.
    #[error("invalid RestServiceRequest payload")]
    InvalidPayload,

    /// Request body could not be serialized.
    #[error("cannot marshal request body: {0}")]
    BodyEncode(String),

    /// Outbound call could not be built or executed.
    #[error("{0}")]
    Transport(String),

    /// Remote endpoint answered with a status >= 300.
    #[error("rest-service error, unable to complete request: {detail}")]
    Remote { status: StatusCode, detail: String },

    /// Success response body did not match the response-kind hint.
    #[error("failed to deserialize response: {0}")]
    Decode(String),
}

impl BridgeError {
    /// Status code reported to the service core.
    pub fn status_code(&self) -> u16 {
        match self {
            BridgeError::Remote { status, .. } => status.as_u16(),
            _ => StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        }
    }

    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::InvalidPayload => "invalid_payload",
            BridgeError::BodyEncode(_) => "body_encode_failure",
            BridgeError::Transport(_) => "transport_failure",
            BridgeError::Remote { .. } => "remote_error",
            BridgeError::Decode(_) => "decode_failure",
        }
    }
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
