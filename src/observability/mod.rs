//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! bridge + ingress produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Request ID flows through every bridge log line
//! - Metrics are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
