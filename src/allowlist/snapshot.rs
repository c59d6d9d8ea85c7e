//! Immutable allow-list snapshot.

use std::collections::HashSet;

use super::normalize_address;

/// One fully-built allow-list.
///
/// There are no mutating methods: a refresh builds a new snapshot and
/// publishes it through [`MembershipSet`](super::MembershipSet).
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MembershipSnapshot {
    addresses: HashSet<String>,
}

impl MembershipSnapshot {
    /// Snapshot with no members.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot, normalizing every entry and dropping blanks.
    pub fn from_addresses<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let addresses = addresses
            .into_iter()
            .map(|a| normalize_address(a.as_ref()))
            .filter(|a| !a.is_empty())
            .collect();
        Self { addresses }
    }

    /// Exact lookup. The address must already be normalized.
    pub fn contains(&self, address: &str) -> bool {
        self.addresses.contains(address)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.addresses.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for MembershipSnapshot {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_addresses(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_normalizes_entries() {
        let snapshot = MembershipSnapshot::from_addresses(["  Foo.Bar@Example.Com ", "", "   "]);
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains("foo.bar@example.com"));
        assert!(!snapshot.contains("Foo.Bar@Example.Com"));
    }

    #[test]
    fn test_snapshot_collapses_duplicates() {
        let snapshot: MembershipSnapshot =
            ["a@example.com", "A@EXAMPLE.COM", "b@example.com"].into_iter().collect();
        assert_eq!(snapshot.len(), 2);

        let mut members: Vec<_> = snapshot.iter().collect();
        members.sort_unstable();
        assert_eq!(members, vec!["a@example.com", "b@example.com"]);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = MembershipSnapshot::empty();
        assert!(snapshot.is_empty());
        assert!(!snapshot.contains(""));
    }
}
