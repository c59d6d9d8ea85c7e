//! Email validation subsystem.
//!
//! # Data Flow
//! ```text
//! Construction:
//!     email_domains → domain.rs (normalize to "@domain", detect "*")
//!     authenticated emails source → refresh.rs (initial synchronous load)
//!         → arm polling task (non-zero interval only)
//!
//! Per request (gate.rs):
//!     address → reject if blank
//!             → lower-case
//!             → domain suffix match
//!             → allow-list lookup (lock-free)
//!             → wildcard override
//! ```
//!
//! # Design Decisions
//! - The decision function is synchronous and never fails
//! - An inaccessible source at startup is fatal; later failures only log
//! - Each validator owns its allow-list and refresh task; no globals

pub mod domain;
pub mod gate;
pub mod refresh;

pub use domain::{DomainRules, WILDCARD};
pub use gate::Validator;
pub use refresh::{RefreshStats, RefreshStatus};

use crate::allowlist::SourceError;

/// Errors that abort validator construction.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// The allow-list source could not be opened.
    #[error("authenticated emails source is not accessible: {0}")]
    SourceUnavailable(#[source] SourceError),

    /// Polling was requested but no tokio runtime is running.
    #[error("allow-list polling requires a running tokio runtime")]
    NoRuntime,

    /// The poll interval cannot be scheduled on the runtime clock.
    #[error("allow-list poll interval {interval:?} is out of range")]
    IntervalOutOfRange { interval: std::time::Duration },
}
