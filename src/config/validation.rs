//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate domain entries and addresses
//! - Validate value ranges (timeouts > 0, poll interval bounded)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::GateConfig;
use crate::validator::WILDCARD;

/// Longest accepted `validator.poll_interval_secs` (one week).
pub const MAX_POLL_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("validator.email_domains contains an empty entry")]
    EmptyDomain,

    #[error("validator.email_domains entry {domain:?} must be a bare domain without '@'")]
    DomainWithAt { domain: String },

    #[error("validator.email_domains entry {domain:?} has surrounding whitespace")]
    UntrimmedDomain { domain: String },

    #[error("validator.poll_interval_secs {secs} exceeds the maximum of {MAX_POLL_INTERVAL_SECS}")]
    PollIntervalTooLarge { secs: u64 },

    #[error("listener.bind_address {address:?} is not a socket address")]
    InvalidBindAddress { address: String },

    #[error("listener.request_timeout_secs must be greater than 0")]
    ZeroRequestTimeout,

    #[error("observability.metrics_address {address:?} is not a socket address")]
    InvalidMetricsAddress { address: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for domain in &config.validator.email_domains {
        if domain == WILDCARD {
            continue;
        }
        if domain.trim().is_empty() {
            errors.push(ValidationError::EmptyDomain);
        } else if domain.contains('@') {
            errors.push(ValidationError::DomainWithAt { domain: domain.clone() });
        } else if domain.trim() != domain {
            errors.push(ValidationError::UntrimmedDomain { domain: domain.clone() });
        }
    }

    if config.validator.poll_interval_secs > MAX_POLL_INTERVAL_SECS {
        errors.push(ValidationError::PollIntervalTooLarge {
            secs: config.validator.poll_interval_secs,
        });
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress {
            address: config.listener.bind_address.clone(),
        });
    }

    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress {
            address: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
