//! Allow-list subsystem.
//!
//! # Data Flow
//! ```text
//! authenticated emails file
//!     → source.rs (read, skip comments, normalize first field)
//!     → snapshot.rs (immutable set, fully built off to the side)
//!     → set.rs (atomic publish via ArcSwap)
//!     → validator reads with a single load per lookup
//! ```
//!
//! # Design Decisions
//! - Snapshots are immutable; a refresh always builds a new one
//! - Readers never lock; old snapshots live until their last reader drops
//! - Exactly one publisher per set (the owning validator's refresh task)

pub mod set;
pub mod snapshot;
pub mod source;

pub use set::MembershipSet;
pub use snapshot::MembershipSnapshot;
pub use source::{parse_addresses, AddressSource, FileSource, ParseError, SourceError};

/// Normalize an address the way allow-list entries are stored.
///
/// Surrounding whitespace is stripped and the result lower-cased.
pub fn normalize_address(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("  Foo.Bar@Example.Com\t"), "foo.bar@example.com");
        assert_eq!(normalize_address("   "), "");
    }
}
