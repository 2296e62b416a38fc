//! `HttpClient` backed by `reqwest`.

use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, Request, StatusCode};

use super::client::{HttpClient, HttpResponse};

/// Build the shared outbound client with a per-call timeout.
pub fn build_reqwest_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}

impl HttpClient for reqwest::Client {
    type Error = reqwest::Error;
    type Response = reqwest::Response;

    /// Converts the `http::Request` into a `reqwest::Request` and sends it.
    async fn execute(&self, request: Request<Bytes>) -> Result<Self::Response, Self::Error> {
        let (parts, body) = request.into_parts();
        let reqwest_request = self
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers)
            .body(body)
            .build()?;

        reqwest::Client::execute(self, reqwest_request).await
    }
}

impl HttpResponse for reqwest::Response {
    type Error = reqwest::Error;

    fn status(&self) -> StatusCode {
        reqwest::Response::status(self)
    }

    fn headers(&self) -> &HeaderMap {
        reqwest::Response::headers(self)
    }

    async fn body(self) -> Result<Bytes, Self::Error> {
        self.bytes().await
    }
}
