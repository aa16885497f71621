//! Candidate validation and the resolved address set
//!
//! Every address that reaches the reconciler has passed [`parse_candidate`].

use std::collections::HashSet;
use std::fmt;
use std::net::Ipv4Addr;

use crate::extract::ExtractionStrategy;

/// Validate a textual candidate as a dotted-quad IPv4 address
///
/// Accepts exactly four dot-separated decimal octets in `0..=255` with no
/// surrounding characters. Leading zeros (`01.2.3.4`) are rejected since
/// they are ambiguous between decimal and octal readings.
pub fn parse_candidate(candidate: &str) -> Option<Ipv4Addr> {
    candidate.parse::<Ipv4Addr>().ok()
}

/// Where a resolved set came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpOrigin {
    /// Extracted from an upstream response
    Feed {
        url: String,
        strategy: ExtractionStrategy,
    },
    /// The configured static fallback list
    Fallback,
}

impl fmt::Display for IpOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpOrigin::Feed { url, strategy } => write!(f, "{} ({})", url, strategy),
            IpOrigin::Fallback => f.write_str("static fallback list"),
        }
    }
}

/// Ordered, deduplicated set of validated IPv4 addresses for one run
///
/// Insertion order is first-seen order. The set is built once and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIpSet {
    ips: Vec<Ipv4Addr>,
    origin: IpOrigin,
}

impl ResolvedIpSet {
    /// Validate and deduplicate `candidates`, keeping at most `limit` entries
    ///
    /// Invalid candidates are dropped silently.
    pub fn from_candidates<I, S>(candidates: I, origin: IpOrigin, limit: Option<usize>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ips = dedup_valid(candidates);
        Self::from_ips(ips, origin, limit)
    }

    /// Build from already validated addresses, deduplicating and truncating
    pub fn from_ips(ips: Vec<Ipv4Addr>, origin: IpOrigin, limit: Option<usize>) -> Self {
        let mut seen = HashSet::with_capacity(ips.len());
        let mut ips: Vec<Ipv4Addr> = ips.into_iter().filter(|ip| seen.insert(*ip)).collect();
        if let Some(limit) = limit {
            ips.truncate(limit);
        }
        Self { ips, origin }
    }

    pub fn ips(&self) -> &[Ipv4Addr] {
        &self.ips
    }

    pub fn origin(&self) -> &IpOrigin {
        &self.origin
    }

    pub fn len(&self) -> usize {
        self.ips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ips.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ipv4Addr> {
        self.ips.iter()
    }
}

/// Validate candidates and drop duplicates, preserving first-seen order
pub(crate) fn dedup_valid<I, S>(candidates: I) -> Vec<Ipv4Addr>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter_map(|c| parse_candidate(c.as_ref()))
        .filter(|ip| seen.insert(*ip))
        .collect()
}
