//! Search requests, per-strategy results and strategy names.

use std::fmt;
use std::str::FromStr;

use hashsleuth_common::{Expected, Sequence};
use num_bigint::BigUint;
use serde::Serialize;

/// The three search strategies, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Published CRC models from the embedded catalogue.
    Catalogue,
    /// Named algorithms offered by the digest provider.
    Documented,
    /// Exhaustive CRC parameter enumeration.
    BruteForce,
}

impl StrategyKind {
    /// Every strategy in run order.
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Catalogue,
        StrategyKind::Documented,
        StrategyKind::BruteForce,
    ];

    /// Name used on the command line and in reports.
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Catalogue => "catalogue",
            StrategyKind::Documented => "documented",
            StrategyKind::BruteForce => "brute-force",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "catalogue" | "catalog" | "known" => Ok(StrategyKind::Catalogue),
            "documented" => Ok(StrategyKind::Documented),
            "brute-force" | "bruteforce" | "brute" => Ok(StrategyKind::BruteForce),
            other => Err(format!("unknown strategy {other:?}")),
        }
    }
}

/// What to search for: a message, the digest it is known to produce, and
/// the digest width in bits.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Digest width in bits.
    pub width: u32,
    /// The message the digest was computed over.
    pub target: Sequence,
    /// The digest that was observed.
    pub expected: Expected,
}

impl SearchRequest {
    pub fn new(width: u32, target: impl Into<Sequence>, expected: Expected) -> Self {
        Self {
            width,
            target: target.into(),
            expected,
        }
    }
}

/// One algorithm or parameter set that reproduced the expected digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    /// Identifier accepted by the digest registry.
    pub id: String,
    /// Human readable description.
    pub description: String,
}

/// Counts and matches from one strategy, or several merged together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// Number of matching candidates.
    pub found: u64,
    /// Number of candidates tried.
    pub searched: BigUint,
    /// The matching candidates.
    pub matches: Vec<Match>,
    /// Whether `matches` holds fewer entries than `found`.
    pub truncated: bool,
}

impl SearchResult {
    /// Record one tried candidate and whether it matched.
    pub(crate) fn record(&mut self, matched: Option<Match>) {
        self.searched += 1u32;
        if let Some(m) = matched {
            self.found += 1;
            self.matches.push(m);
        }
    }

    /// Add another result's counts and matches to this one.
    pub fn merge(&mut self, other: SearchResult) {
        self.found += other.found;
        self.searched += other.searched;
        self.matches.extend(other.matches);
        self.truncated |= other.truncated;
    }

    pub fn is_found(&self) -> bool {
        self.found > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_names_round_trip() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.name().parse::<StrategyKind>().unwrap(), kind);
        }
        assert_eq!("BRUTE_FORCE".parse::<StrategyKind>().unwrap(), StrategyKind::BruteForce);
        assert!("guess".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn test_merge_adds_counts() {
        let mut total = SearchResult::default();
        let mut a = SearchResult::default();
        a.record(None);
        a.record(Some(Match {
            id: "crc16".into(),
            description: "CRC-16/ARC".into(),
        }));
        let mut b = SearchResult::default();
        b.searched = BigUint::from(u64::MAX) + 1u32;
        b.truncated = true;

        total.merge(a);
        total.merge(b);
        assert_eq!(total.found, 1);
        assert_eq!(total.searched, BigUint::from(u64::MAX) + 3u32);
        assert_eq!(total.matches.len(), 1);
        assert!(total.is_found());
        assert!(total.truncated);
    }
}
