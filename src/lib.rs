//! Email authorization gate.
//!
//! Decides whether an email address may pass, from a static list of allowed
//! domains and an allow-list file that is re-read on a fixed interval.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use email_gate::allowlist::FileSource;
//! use email_gate::Validator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let validator = Validator::with_source(
//!     ["example.com"],
//!     Arc::new(FileSource::new("/etc/email-gate/emails.csv")),
//!     Duration::from_secs(60),
//! )?;
//! assert!(validator.is_valid("someone@example.com"));
//! # Ok(())
//! # }
//! ```

pub mod allowlist;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod validator;

pub use config::GateConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use validator::{SetupError, Validator};
