//! REST bridge service: performs HTTP calls described by message-bus requests.

pub mod bridge;
pub mod bus;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use bridge::{Outcome, RequestDescriptor, ResponseKind, RestBridge};
pub use bus::{Payload, ServiceCore, ServiceRequest};
pub use config::BridgeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
