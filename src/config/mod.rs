//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → CLI overrides applied
//!     → validation.rs (semantic checks)
//!     → BridgeConfig (validated, immutable)
//!     → host override copied into the bridge at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; a new host override means a new bridge
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError, ConfigOverrides};
pub use schema::{BridgeConfig, ListenerConfig, ObservabilityConfig, RestBridgeConfig};
pub use validation::{validate_config, ValidationError};
