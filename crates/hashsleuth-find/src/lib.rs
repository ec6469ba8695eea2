//! Identify the algorithm behind a digest.
//!
//! Given a message, the digest it produced and the digest width, three
//! strategies look for algorithms that reproduce it:
//!
//! 1. [`CatalogueLookup`] - every published CRC model of that width
//! 2. [`DocumentedSweep`] - every named algorithm of a [`DigestProvider`](hashsleuth_digest::DigestProvider)
//! 3. [`BruteForce`] - every polynomial, with conventional `init`/`xorOut`
//!    values and both reflections
//!
//! [`SearchOrchestrator`] runs them in that order and reports a
//! [`SearchReport`].
//!
//! # Example
//!
//! ```
//! use hashsleuth_common::{Encoding, Expected};
//! use hashsleuth_find::{search_algorithm, SearchOptions, StrategyKind};
//!
//! let report = search_algorithm(
//!     16,
//!     b"123456789",
//!     Expected::text("31C3", Encoding::Hex),
//!     SearchOptions::default().without(StrategyKind::BruteForce),
//! )?;
//! assert!(report.matches.iter().any(|m| m.id == "CRC-16/XMODEM"));
//! # Ok::<(), hashsleuth_find::Error>(())
//! ```

mod brute;
mod catalogue;
mod documented;
mod error;
mod observer;
mod orchestrator;
mod result;
mod strategy;

pub use brute::{BruteForce, MATCH_LIMIT, PROGRESS_BLOCK, TRIALS_PER_POLY};
pub use catalogue::CatalogueLookup;
pub use documented::DocumentedSweep;
pub use error::{Error, Result};
pub use observer::{CancelToken, ChannelObserver, NullObserver, SearchEvent, SearchObserver};
pub use orchestrator::{Outcome, SearchOptions, SearchOrchestrator, SearchReport, StrategySummary};
pub use result::{Match, SearchRequest, SearchResult, StrategyKind};
pub use strategy::{SearchContext, Strategy};

use hashsleuth_common::Expected;
use hashsleuth_crc::CrcModel;
use hashsleuth_digest::Registry;

/// Search with the built-in registry, no observer and no cancellation.
pub fn search_algorithm(
    width: u32,
    target: &[u8],
    expected: Expected,
    options: SearchOptions,
) -> Result<SearchReport> {
    let registry = Registry::builtin()?;
    let request = SearchRequest::new(width, target, expected);
    SearchOrchestrator::new(&registry, options)?.search(&request, &NullObserver, &CancelToken::new())
}

/// CRC of `data` under `model`, as big-endian bytes.
pub fn compute_crc(model: &CrcModel, data: &[u8]) -> Vec<u8> {
    hashsleuth_crc::compute_bytes(model, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_crc_is_big_endian() {
        let catalogue = hashsleuth_crc::Catalogue::builtin().unwrap();
        let model = &catalogue.get("CRC-32/ISO-HDLC").unwrap().model;
        assert_eq!(compute_crc(model, b"123456789"), vec![0xCB, 0xF4, 0x39, 0x26]);

        let xmodem: CrcModel = "16,1021,0000,false,false,0000".parse().unwrap();
        assert_eq!(compute_crc(&xmodem, b"123456789"), vec![0x31, 0xC3]);
    }
}
