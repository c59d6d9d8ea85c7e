//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every section has defaults so a minimal (even empty) file is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Allow rules.
    pub validator: ValidatorConfig,

    /// HTTP listener settings.
    pub listener: ListenerConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Allow rules: static domains plus a polled allow-list file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Allowed email domains; `"*"` allows every address.
    pub email_domains: Vec<String>,

    /// Allow-list file (first CSV field of each record is an address).
    /// Absent or empty disables the allow-list rule.
    pub authenticated_emails_file: Option<PathBuf>,

    /// Seconds between allow-list reloads; 0 loads the file once.
    pub poll_interval_secs: u64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            email_domains: Vec::new(),
            authenticated_emails_file: None,
            poll_interval_secs: 60,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:4181").
    pub bind_address: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:4181".to_string(),
            request_timeout_secs: 5,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: GateConfig = toml::from_str("").unwrap();
        assert!(config.validator.email_domains.is_empty());
        assert!(config.validator.authenticated_emails_file.is_none());
        assert_eq!(config.validator.poll_interval_secs, 60);
        assert_eq!(config.listener.bind_address, "127.0.0.1:4181");
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_full_document() {
        let config: GateConfig = toml::from_str(
            r#"
            [validator]
            email_domains = ["example.com", "*"]
            authenticated_emails_file = "/etc/email-gate/emails.csv"
            poll_interval_secs = 0

            [listener]
            bind_address = "0.0.0.0:8080"

            [observability]
            log_format = "json"
            metrics_enabled = true
            "#,
        )
        .unwrap();

        assert_eq!(config.validator.email_domains, vec!["example.com", "*"]);
        assert_eq!(
            config.validator.authenticated_emails_file,
            Some(PathBuf::from("/etc/email-gate/emails.csv"))
        );
        assert_eq!(config.validator.poll_interval_secs, 0);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.listener.request_timeout_secs, 5);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert!(config.observability.metrics_enabled);
    }
}
