//! Message-bus boundary.
//!
//! # Data Flow
//! ```text
//! bus delivers ServiceRequest on the bridge channel
//!     → bridge normalizes Payload, performs the HTTP call
//!     → exactly one ServiceCore callback per request
//!     → (ChannelCore) BusResponse sent back to whoever is waiting
//! ```
//!
//! # Design Decisions
//! - Only the values that cross the boundary live here; topic registration,
//!   delivery and correlation plumbing belong to the bus
//! - `ServiceCore` exposes exactly the three reporting callbacks

pub mod message;
pub mod service_core;

pub use message::{Payload, ServiceRequest, REST_SERVICE_CHANNEL};
pub use service_core::{BusResponse, ChannelCore, ResponseTag, ServiceCore};
