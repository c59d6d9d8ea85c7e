//! Periodic allow-list refresh.
//!
//! # Responsibilities
//! - Load the source once synchronously at construction
//! - Re-load it on a fixed interval and publish each successful result
//! - Keep the current snapshot when a load fails
//! - Track refresh outcomes for status reporting
//!
//! # Design Decisions
//! - One task per validator, owned by it and aborted on drop
//! - Loads run on the blocking pool; the source API is synchronous
//! - No catch-up bursts: missed ticks are delayed, not replayed

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::allowlist::{AddressSource, MembershipSet, MembershipSnapshot, SourceError};
use crate::observability::metrics;
use crate::validator::SetupError;

/// Outcome counters for allow-list loads.
#[derive(Debug, Default)]
pub struct RefreshStats {
    successes: AtomicU64,
    failures: AtomicU64,
    // Milliseconds since the epoch; 0 means never.
    last_success_ms: AtomicU64,
    last_failure_ms: AtomicU64,
}

impl RefreshStats {
    fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
        self.last_success_ms.store(now_ms(), Ordering::Relaxed);
    }

    fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        self.last_failure_ms.store(now_ms(), Ordering::Relaxed);
    }

    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Time of the last load that published a snapshot.
    pub fn last_success(&self) -> Option<SystemTime> {
        from_ms(self.last_success_ms.load(Ordering::Relaxed))
    }

    pub fn last_failure(&self) -> Option<SystemTime> {
        from_ms(self.last_failure_ms.load(Ordering::Relaxed))
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn from_ms(ms: u64) -> Option<SystemTime> {
    (ms != 0).then(|| UNIX_EPOCH + Duration::from_millis(ms))
}

fn to_unix_ms(time: Option<SystemTime>) -> Option<u64> {
    time.and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as u64)
}

/// Point-in-time view of a validator's refresh state.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshStatus {
    /// Source description (file path).
    pub source: String,
    /// Polling interval in milliseconds; 0 when polling is disabled.
    pub interval_ms: u64,
    pub successes: u64,
    pub failures: u64,
    pub last_success_unix_ms: Option<u64>,
    pub last_failure_unix_ms: Option<u64>,
    /// Entries in the currently published snapshot.
    pub entries: usize,
}

impl RefreshStatus {
    pub(crate) fn new(source: &str, interval: Duration, stats: &RefreshStats, entries: usize) -> Self {
        Self {
            source: source.to_string(),
            interval_ms: interval.as_millis() as u64,
            successes: stats.successes(),
            failures: stats.failures(),
            last_success_unix_ms: to_unix_ms(stats.last_success()),
            last_failure_unix_ms: to_unix_ms(stats.last_failure()),
            entries,
        }
    }
}

/// Loads a source and publishes the result into a membership set.
#[derive(Clone)]
pub(crate) struct Refresher {
    source: Arc<dyn AddressSource>,
    members: Arc<MembershipSet>,
    stats: Arc<RefreshStats>,
}

impl Refresher {
    pub(crate) fn new(
        source: Arc<dyn AddressSource>,
        members: Arc<MembershipSet>,
        stats: Arc<RefreshStats>,
    ) -> Self {
        Self { source, members, stats }
    }

    /// Load once and publish on success. Returns the published entry count.
    pub(crate) fn reload(&self) -> Result<usize, SourceError> {
        match self.source.load() {
            Ok(addresses) => {
                let snapshot = MembershipSnapshot::from_addresses(addresses);
                let entries = snapshot.len();
                self.members.publish(snapshot);
                self.stats.record_success();
                metrics::record_refresh_success(entries);
                Ok(entries)
            }
            Err(e) => {
                self.stats.record_failure();
                metrics::record_refresh_failure();
                Err(e)
            }
        }
    }

    async fn tick(&self) {
        let source = self.source.describe();
        tracing::debug!(source = %source, "Polling allow-list for updates");

        let refresher = self.clone();
        match tokio::task::spawn_blocking(move || refresher.reload()).await {
            Ok(Ok(entries)) => {
                tracing::debug!(source = %source, entries, "Allow-list refreshed");
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    source = %source,
                    error = %e,
                    "Allow-list refresh failed, keeping current snapshot"
                );
            }
            Err(e) => {
                tracing::error!(source = %source, error = %e, "Allow-list refresh worker failed");
            }
        }
    }

    async fn run(self, start: Instant, period: Duration) {
        let mut ticker = time::interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }
}

/// Background polling task. Aborted when dropped.
pub(crate) struct RefreshTask {
    handle: JoinHandle<()>,
}

impl RefreshTask {
    /// Spawn on the current tokio runtime. The first reload happens one
    /// `period` from now.
    pub(crate) fn spawn(refresher: Refresher, period: Duration) -> Result<Self, SetupError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| SetupError::NoRuntime)?;
        let start = Instant::now()
            .checked_add(period)
            .ok_or(SetupError::IntervalOutOfRange { interval: period })?;
        let handle = runtime.spawn(refresher.run(start, period));
        Ok(Self { handle })
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
