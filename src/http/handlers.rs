//! Gate endpoints.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::observability::metrics;
use crate::validator::RefreshStatus;

/// Header carrying the authenticated address from the upstream proxy.
pub const EMAIL_HEADER: &str = "x-auth-request-email";

#[derive(Debug, Deserialize)]
pub struct ValidateParams {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub version: &'static str,
    pub allow_all: bool,
    pub email_domains: usize,
    pub allowlist_entries: usize,
    pub refresh: Option<RefreshStatus>,
}

/// `GET /validate`: 202 when allowed, 403 when denied, 401 when no
/// address was supplied. When the header is present it is the only input;
/// the `email` query parameter is consulted only in its absence.
pub async fn validate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ValidateParams>,
) -> StatusCode {
    let email = match headers.get(EMAIL_HEADER) {
        // A header that is not visible ASCII counts as missing.
        Some(value) => value.to_str().ok().map(str::to_string),
        None => params.email,
    }
    .filter(|e| !e.trim().is_empty());

    let Some(email) = email else {
        metrics::record_decision("missing");
        return StatusCode::UNAUTHORIZED;
    };

    if state.validator.is_valid(&email) {
        metrics::record_decision("allow");
        tracing::debug!(email = %email, "Email authorized");
        StatusCode::ACCEPTED
    } else {
        metrics::record_decision("deny");
        tracing::info!(email = %email, "Email not authorized");
        StatusCode::FORBIDDEN
    }
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn status(State(state): State<AppState>) -> Json<StatusReport> {
    let validator = &state.validator;
    Json(StatusReport {
        version: env!("CARGO_PKG_VERSION"),
        allow_all: validator.domain_rules().allow_all(),
        email_domains: validator.domain_rules().suffixes().len(),
        allowlist_entries: validator.allowlist_len(),
        refresh: validator.refresh_status(),
    })
}
