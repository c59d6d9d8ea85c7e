//! Metrics collection and exposition.
//!
//! # Metrics
//! - `email_gate_refresh_total` (counter): allow-list loads by result
//! - `email_gate_allowlist_entries` (gauge): size of the published snapshot
//! - `email_gate_last_refresh_timestamp_seconds` (gauge): last successful load
//! - `email_gate_decisions_total` (counter): HTTP gate decisions by result
//!
//! # Design Decisions
//! - Without an installed recorder every update is a no-op
//! - The core decision function records nothing; the HTTP layer does

use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_refresh_success(entries: usize) {
    ::metrics::counter!("email_gate_refresh_total", "result" => "success").increment(1);
    ::metrics::gauge!("email_gate_allowlist_entries").set(entries as f64);

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64();
    ::metrics::gauge!("email_gate_last_refresh_timestamp_seconds").set(now);
}

pub fn record_refresh_failure() {
    ::metrics::counter!("email_gate_refresh_total", "result" => "failure").increment(1);
}

/// `result` is one of `allow`, `deny`, `missing`.
pub fn record_decision(result: &'static str) {
    ::metrics::counter!("email_gate_decisions_total", "result" => result).increment(1);
}
