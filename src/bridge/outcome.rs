//! Invocation outcomes and their reporting.

use serde::{Deserialize, Serialize};

use crate::bridge::error::{BridgeError, BridgeResult};
use crate::bridge::response::ResponseBody;
use crate::bus::{ServiceCore, ServiceRequest};

/// Structured payload attached to remote errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub error_code: u16,
    pub message: String,
}

/// Result of one bridge invocation.
///
/// Either `decoded_body` (success) or `error_message` (failure) is set, never both.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub succeeded: bool,
    pub status_code: u16,
    pub decoded_body: Option<ResponseBody>,
    pub error_message: Option<String>,
    pub error_payload: Option<ErrorPayload>,
}

impl Outcome {
    pub fn success(status_code: u16, body: ResponseBody) -> Self {
        Self {
            succeeded: true,
            status_code,
            decoded_body: Some(body),
            error_message: None,
            error_payload: None,
        }
    }

    pub fn failure(error: &BridgeError) -> Self {
        let status_code = error.status_code();
        let message = error.to_string();
        let error_payload = match error {
            BridgeError::Remote { .. } => Some(ErrorPayload {
                error_code: status_code,
                message: message.clone(),
            }),
            _ => None,
        };

        Self {
            succeeded: false,
            status_code,
            decoded_body: None,
            error_message: Some(message),
            error_payload,
        }
    }

    /// Deliver this outcome through exactly one service-core callback.
    pub fn report(&self, request: &ServiceRequest, core: &dyn ServiceCore) {
        match (&self.decoded_body, &self.error_message, &self.error_payload) {
            (Some(body), _, _) => core.send_response(request, body.clone()),
            (None, Some(message), Some(payload)) => core.send_error_response_with_payload(
                request,
                self.status_code,
                message.clone(),
                payload.clone(),
            ),
            (None, Some(message), None) => {
                core.send_error_response(request, self.status_code, message.clone())
            }
            (None, None, _) => core.send_error_response(
                request,
                self.status_code,
                "rest-service produced no result".to_string(),
            ),
        }
    }
}

impl From<BridgeResult<(u16, ResponseBody)>> for Outcome {
    fn from(result: BridgeResult<(u16, ResponseBody)>) -> Self {
        match result {
            Ok((status, body)) => Outcome::success(status, body),
            Err(e) => Outcome::failure(&e),
        }
    }
}
