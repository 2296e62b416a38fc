//! Outbound call construction and execution.
//!
//! # Responsibilities
//! - Rewrite the URL authority when a host override is configured
//! - Copy caller headers and default `Content-Type`
//! - Execute exactly one call through the injected `HttpClient`

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{Method, Request, Uri};
use url::Url;

use crate::bridge::error::{BridgeError, BridgeResult};
use crate::bridge::request::RequestDescriptor;
use crate::http::HttpClient;

/// `Content-Type` sent when the caller supplies none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/merge-patch+json";

/// Resolve the call target.
///
/// With an override only the authority (`host[:port]`) is replaced; scheme,
/// path and query are kept. Addresses that do not parse as absolute URLs are
/// returned verbatim.
pub fn resolve_url(address: &str, base_host: Option<&str>) -> String {
    let Some(base_host) = base_host else {
        return address.to_string();
    };

    let Ok(mut url) = Url::parse(address) else {
        return address.to_string();
    };

    let Ok(authority) = Url::parse(&format!("{}://{}", url.scheme(), base_host)) else {
        return address.to_string();
    };

    if url.set_host(authority.host_str()).is_err() || url.set_port(authority.port()).is_err() {
        return address.to_string();
    }

    url.to_string()
}

/// Build the outbound request for `descriptor` against `url`.
pub fn build_request(
    descriptor: &RequestDescriptor,
    url: &str,
    body: Bytes,
) -> BridgeResult<Request<Bytes>> {
    // An empty method means GET
    let method = if descriptor.http_method().is_empty() {
        Method::GET
    } else {
        Method::from_bytes(descriptor.http_method().as_bytes()).map_err(|e| {
            BridgeError::Transport(format!("invalid method {:?}: {}", descriptor.http_method(), e))
        })?
    };

    let uri: Uri = url
        .parse()
        .map_err(|e| BridgeError::Transport(format!("invalid URL {:?}: {}", url, e)))?;

    let mut request = Request::new(body);
    *request.method_mut() = method;
    *request.uri_mut() = uri;

    let headers = request.headers_mut();
    for (name, value) in descriptor.headers() {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| BridgeError::Transport(format!("invalid header name {:?}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| BridgeError::Transport(format!("invalid value for header {}: {}", name, e)))?;
        headers.append(name, value);
    }

    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    }

    Ok(request)
}

/// Execute the request once, mapping any client failure to `Transport`.
pub async fn invoke<C: HttpClient>(client: &C, request: Request<Bytes>) -> BridgeResult<C::Response> {
    client
        .execute(request)
        .await
        .map_err(|e| BridgeError::Transport(e.to_string()))
}
