//! The email decision function.

use std::sync::Arc;
use std::time::Duration;

use crate::allowlist::{AddressSource, FileSource, MembershipSet};
use crate::config::ValidatorConfig;
use crate::validator::domain::DomainRules;
use crate::validator::refresh::{RefreshStats, RefreshStatus, RefreshTask, Refresher};
use crate::validator::SetupError;

/// Refresh wiring for a validator configured with an allow-list source.
struct RefreshHandle {
    source: String,
    interval: Duration,
    stats: Arc<RefreshStats>,
    // Held only so the task is aborted with the validator.
    _task: Option<RefreshTask>,
}

/// Decides whether an email address may pass the gate.
///
/// An address is allowed when its domain is in the configured domain list,
/// when it is on the allow-list, or when the wildcard domain is configured.
/// Empty input is always rejected.
///
/// `Validator` is `Send + Sync`; share it behind an `Arc`. Reads never
/// block on the background refresh.
pub struct Validator {
    rules: DomainRules,
    members: Arc<MembershipSet>,
    refresh: Option<RefreshHandle>,
}

impl Validator {
    /// Validator with domain rules only. The allow-list stays empty.
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            rules: DomainRules::new(domains),
            members: Arc::new(MembershipSet::new()),
            refresh: None,
        }
    }

    /// Validator backed by an allow-list source.
    ///
    /// The source is loaded once before this returns. A non-zero `interval`
    /// spawns a task on the current tokio runtime that reloads it on that
    /// period; a zero interval disables polling.
    ///
    /// # Errors
    ///
    /// - [`SetupError::SourceUnavailable`] if the source cannot be opened
    /// - [`SetupError::NoRuntime`] if polling is requested outside a runtime
    /// - [`SetupError::IntervalOutOfRange`] if `interval` overflows the runtime clock
    pub fn with_source<I, S>(
        domains: I,
        source: Arc<dyn AddressSource>,
        interval: Duration,
    ) -> Result<Self, SetupError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = DomainRules::new(domains);
        let members = Arc::new(MembershipSet::new());
        let stats = Arc::new(RefreshStats::default());
        let description = source.describe();

        tracing::info!(source = %description, "Using authenticated emails source");

        let refresher = Refresher::new(source, members.clone(), stats.clone());
        match refresher.reload() {
            Ok(entries) => {
                tracing::info!(source = %description, entries, "Allow-list loaded");
            }
            Err(e) if e.is_unavailable() => return Err(SetupError::SourceUnavailable(e)),
            Err(e) => {
                tracing::error!(
                    source = %description,
                    error = %e,
                    "Allow-list could not be parsed, starting with an empty set"
                );
            }
        }

        let task = if interval.is_zero() {
            tracing::info!(source = %description, "Allow-list polling disabled");
            None
        } else {
            tracing::info!(
                source = %description,
                interval_ms = interval.as_millis() as u64,
                "Polling allow-list for updates"
            );
            Some(RefreshTask::spawn(refresher, interval)?)
        };

        Ok(Self {
            rules,
            members,
            refresh: Some(RefreshHandle {
                source: description,
                interval,
                stats,
                _task: task,
            }),
        })
    }

    /// Build from configuration. An absent or empty file path leaves the
    /// allow-list rule disabled.
    pub fn from_config(config: &ValidatorConfig) -> Result<Self, SetupError> {
        let file = config
            .authenticated_emails_file
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty());

        match file {
            Some(path) => Self::with_source(
                &config.email_domains,
                Arc::new(FileSource::new(path.clone())),
                Duration::from_secs(config.poll_interval_secs),
            ),
            None => Ok(Self::new(&config.email_domains)),
        }
    }

    /// The decision function.
    pub fn is_valid(&self, email: &str) -> bool {
        if email.trim().is_empty() {
            return false;
        }

        let email = email.to_lowercase();
        let mut valid = self.rules.matches_lowercase(&email);
        if !valid {
            valid = self.members.contains(&email);
        }
        if self.rules.allow_all() {
            valid = true;
        }
        valid
    }

    /// Convert into a plain closure.
    pub fn into_fn(self) -> impl Fn(&str) -> bool + Send + Sync + 'static {
        move |email: &str| self.is_valid(email)
    }

    pub fn domain_rules(&self) -> &DomainRules {
        &self.rules
    }

    /// Entries in the currently published allow-list snapshot.
    pub fn allowlist_len(&self) -> usize {
        self.members.len()
    }

    /// Refresh state, or `None` when no allow-list source is configured.
    pub fn refresh_status(&self) -> Option<RefreshStatus> {
        self.refresh.as_ref().map(|refresh| {
            RefreshStatus::new(&refresh.source, refresh.interval, &refresh.stats, self.members.len())
        })
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.rules)
            .field("allowlist_entries", &self.members.len())
            .field("source", &self.refresh.as_ref().map(|r| r.source.as_str()))
            .finish()
    }
}
