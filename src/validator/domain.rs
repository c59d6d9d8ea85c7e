//! Static domain suffix rules.
//!
//! # Design Decisions
//! - Domains are stored as `@domain` so a match is anchored at the `@`
//!   (`evilexample.com` never matches `example.com`)
//! - The wildcard is a flag, never a suffix entry
//! - Suffix matching only; no regex in the hot path

/// Domain entry that authorizes every address.
pub const WILDCARD: &str = "*";

/// Normalized allowed-domain list, computed once at construction.
#[derive(Debug, Clone, Default)]
pub struct DomainRules {
    suffixes: Vec<String>,
    allow_all: bool,
}

impl DomainRules {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Self::default();
        for domain in domains {
            let domain = domain.as_ref();
            if domain == WILDCARD {
                rules.allow_all = true;
                continue;
            }
            rules.suffixes.push(format!("@{}", domain.to_lowercase()));
        }
        rules
    }

    /// True if the wildcard was configured.
    pub fn allow_all(&self) -> bool {
        self.allow_all
    }

    /// Configured suffixes, each with its leading `@`.
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Case-insensitive suffix match.
    pub fn matches(&self, address: &str) -> bool {
        self.matches_lowercase(&address.to_lowercase())
    }

    /// Suffix match for an address that is already lower-case.
    pub(crate) fn matches_lowercase(&self, address: &str) -> bool {
        self.allow_all || self.suffixes.iter().any(|suffix| address.ends_with(suffix.as_str()))
    }
}
