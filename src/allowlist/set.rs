//! Lock-free publication of allow-list snapshots.
//!
//! # Responsibilities
//! - Hold exactly one current [`MembershipSnapshot`]
//! - Answer membership queries without locking
//! - Replace the snapshot wholesale in one atomic store
//!
//! # Design Decisions
//! - `ArcSwap` gives readers a wait-free load with acquire/release ordering
//! - Replaced snapshots are freed when the last outstanding guard drops
//! - A single writer (the refresh task) publishes; readers are unbounded

use std::sync::Arc;

use arc_swap::ArcSwap;

use super::MembershipSnapshot;

/// Currently published allow-list.
#[derive(Debug)]
pub struct MembershipSet {
    current: ArcSwap<MembershipSnapshot>,
}

impl MembershipSet {
    /// Create an empty set. Every lookup returns false until a publish.
    pub fn new() -> Self {
        Self::with_snapshot(MembershipSnapshot::empty())
    }

    pub fn with_snapshot(snapshot: MembershipSnapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(snapshot),
        }
    }

    /// Membership test against the snapshot current at the time of the call.
    pub fn contains(&self, address: &str) -> bool {
        self.current.load().contains(address)
    }

    /// Make `snapshot` visible to every subsequent read.
    pub fn publish(&self, snapshot: MembershipSnapshot) {
        self.current.store(Arc::new(snapshot));
    }

    /// Owned handle to the current snapshot, for several consistent lookups.
    pub fn snapshot(&self) -> Arc<MembershipSnapshot> {
        self.current.load_full()
    }

    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }
}

impl Default for MembershipSet {
    fn default() -> Self {
        Self::new()
    }
}
