//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound (bridge → remote endpoint):
//!     → client.rs (HttpClient / HttpResponse traits)
//!     → reqwest_client.rs (production implementation)
//!
//! Inbound (local ingress → bus channel):
//!     → server.rs (Axum setup, POST /bus/{channel})
//!     → request.rs (correlation id)
//!     → bridge
//! ```

pub mod client;
pub mod reqwest_client;
pub mod request;
pub mod server;

pub use client::{HttpClient, HttpResponse};
pub use reqwest_client::build_reqwest_client;
pub use request::{request_id, X_REQUEST_ID};
pub use server::HttpServer;
