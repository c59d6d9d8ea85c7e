//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GateConfig (validated, immutable)
//!     → ValidatorConfig handed to Validator::from_config
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the allow-list file is the only
//!   thing re-read at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{GateConfig, ListenerConfig, LogFormat, ObservabilityConfig, ValidatorConfig};
pub use validation::{ValidationError, MAX_POLL_INTERVAL_SECS};
