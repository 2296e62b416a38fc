//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::{HeaderMap, Method, Request, StatusCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use rest_bridge::bridge::{ErrorPayload, ResponseBody};
use rest_bridge::bus::{ServiceCore, ServiceRequest};
use rest_bridge::http::{HttpClient, HttpResponse};

/// A request as seen by the canned client.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct CannedError(pub String);

struct CannedState {
    status: StatusCode,
    body: Bytes,
    failure: Option<String>,
    requests: Mutex<Vec<RecordedRequest>>,
    drained: AtomicUsize,
    released: AtomicUsize,
}

/// `HttpClient` double returning a fixed response and recording every call.
#[derive(Clone)]
pub struct CannedClient {
    state: Arc<CannedState>,
}

impl CannedClient {
    pub fn respond(status: u16, body: impl Into<Bytes>) -> Self {
        Self::build(StatusCode::from_u16(status).unwrap(), body.into(), None)
    }

    /// A client whose every call fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self::build(StatusCode::OK, Bytes::new(), Some(message.to_string()))
    }

    fn build(status: StatusCode, body: Bytes, failure: Option<String>) -> Self {
        Self {
            state: Arc::new(CannedState {
                status,
                body,
                failure,
                requests: Mutex::new(Vec::new()),
                drained: AtomicUsize::new(0),
                released: AtomicUsize::new(0),
            }),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    /// Responses whose body was read.
    pub fn drained(&self) -> usize {
        self.state.drained.load(Ordering::SeqCst)
    }

    /// Responses dropped (read or not).
    pub fn released(&self) -> usize {
        self.state.released.load(Ordering::SeqCst)
    }
}

impl HttpClient for CannedClient {
    type Error = CannedError;
    type Response = CannedResponse;

    async fn execute(&self, request: Request<Bytes>) -> Result<Self::Response, Self::Error> {
        let (parts, body) = request.into_parts();
        self.state.requests.lock().unwrap().push(RecordedRequest {
            method: parts.method,
            uri: parts.uri.to_string(),
            headers: parts.headers,
            body,
        });

        if let Some(message) = &self.state.failure {
            return Err(CannedError(message.clone()));
        }

        Ok(CannedResponse {
            status: self.state.status,
            headers: HeaderMap::new(),
            body: self.state.body.clone(),
            state: Arc::clone(&self.state),
        })
    }
}

pub struct CannedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    state: Arc<CannedState>,
}

impl HttpResponse for CannedResponse {
    type Error = CannedError;

    fn status(&self) -> StatusCode {
        self.status
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    async fn body(self) -> Result<Bytes, Self::Error> {
        self.state.drained.fetch_add(1, Ordering::SeqCst);
        Ok(self.body.clone())
    }
}

impl Drop for CannedResponse {
    fn drop(&mut self) {
        self.state.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// One service-core callback.
#[derive(Debug, Clone, PartialEq)]
pub enum Callback {
    Response(ResponseBody),
    Error { status: u16, message: String },
    ErrorWithPayload { status: u16, message: String, payload: ErrorPayload },
}

/// `ServiceCore` that records callbacks in order.
#[derive(Default)]
pub struct RecordingCore {
    callbacks: Mutex<Vec<Callback>>,
}

impl RecordingCore {
    pub fn callbacks(&self) -> Vec<Callback> {
        self.callbacks.lock().unwrap().clone()
    }
}

impl ServiceCore for RecordingCore {
    fn send_response(&self, _request: &ServiceRequest, body: ResponseBody) {
        self.callbacks.lock().unwrap().push(Callback::Response(body));
    }

    fn send_error_response(&self, _request: &ServiceRequest, status: u16, message: String) {
        self.callbacks.lock().unwrap().push(Callback::Error { status, message });
    }

    fn send_error_response_with_payload(
        &self,
        _request: &ServiceRequest,
        status: u16,
        message: String,
        payload: ErrorPayload,
    ) {
        self.callbacks
            .lock()
            .unwrap()
            .push(Callback::ErrorWithPayload { status, message, payload });
    }
}

/// Raw HTTP request text received by the mock backend.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub head: String,
    pub body: Vec<u8>,
}

impl ReceivedRequest {
    /// Value of the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }

    pub fn header_count(&self, name: &str) -> usize {
        self.head
            .lines()
            .skip(1)
            .filter_map(|line| line.split_once(':'))
            .filter(|(key, _)| key.trim().eq_ignore_ascii_case(name))
            .count()
    }

    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or("")
    }
}

/// Start a mock backend on an ephemeral port answering every request with
/// `status` and `body`. Received requests are forwarded on the returned channel.
pub async fn start_mock_backend(
    status: u16,
    body: &'static str,
) -> (SocketAddr, mpsc::UnboundedReceiver<ReceivedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        if let Some(request) = read_request(&mut socket).await {
                            let _ = tx.send(request);
                        }
                        let status_text = match status {
                            200 => "200 OK",
                            204 => "204 No Content",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, rx)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<ReceivedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let mut request = ReceivedRequest {
        head,
        body: buf[head_end + 4..].to_vec(),
    };

    let content_length = request
        .header("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    while request.body.len() < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        request.body.extend_from_slice(&chunk[..n]);
    }

    Some(request)
}
