//! HTTP gate subsystem.
//!
//! # Data Flow
//! ```text
//! auth_request sub-request from the reverse proxy
//!     → server.rs (Axum setup, trace + timeout layers)
//!     → handlers.rs (extract address from header or query)
//!     → Validator::is_valid
//!     → 202 Accepted / 403 Forbidden / 401 Unauthorized
//! ```

pub mod handlers;
pub mod server;

pub use handlers::EMAIL_HEADER;
pub use server::{AppState, HttpServer};
