//! Outbound HTTP client abstraction.
//!
//! The bridge runs against these traits so the network client can be swapped
//! for a test double. Implementations must be safe to share across
//! concurrent invocations.

use std::future::Future;

use bytes::Bytes;
use http::{HeaderMap, Request, StatusCode};

/// Executes one outbound HTTP request.
pub trait HttpClient: Send + Sync {
    /// Error for a request that could not be executed.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Response returned for an executed request.
    type Response: HttpResponse;

    /// Execute `request` and return the response head with an unread body.
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send;
}

/// An HTTP response whose body has not been read yet.
pub trait HttpResponse: Send {
    /// Error while reading the body.
    type Error: std::error::Error + Send + Sync + 'static;

    fn status(&self) -> StatusCode;

    fn headers(&self) -> &HeaderMap;

    /// Consume the response and read the whole body.
    fn body(self) -> impl Future<Output = Result<Bytes, Self::Error>> + Send;
}
