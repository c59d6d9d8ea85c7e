//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (binary):
//!     Load config → Validate → Init logging/metrics → Build validator
//!     (initial allow-list load) → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain requests → Drop validator
//!     (aborts the refresh task) → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: an inaccessible allow-list at startup is fatal
//! - Listener starts last (traffic only when the allow-list is loaded)

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
