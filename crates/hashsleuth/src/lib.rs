//! Hashsleuth - checksum computation and unknown-algorithm discovery.
//!
//! This crate provides a unified interface to the hashsleuth crates.
//!
//! # Crates
//!
//! - [`hashsleuth_common`] - Byte sequences, digest encodings and comparison
//! - [`hashsleuth_crc`] - Parameterised CRC engine and model catalogue
//! - [`hashsleuth_digest`] - Named digest algorithms (CRCs, checksums, xxHash, SHA-2)
//! - [`hashsleuth_find`] - Search for the algorithm that produced a digest
//!
//! # Example
//!
//! ```
//! use hashsleuth::prelude::*;
//!
//! // Which 32-bit algorithm turns "123456789" into cbf43926?
//! let target = Sequence::parse("txt:123456789")?;
//! let expected = Expected::text("cbf43926", Encoding::Hex);
//! let options = SearchOptions::default().without(StrategyKind::BruteForce);
//!
//! let report = search_algorithm(32, target.as_bytes(), expected, options)?;
//! assert_eq!(report.outcome, Outcome::Found);
//! assert!(report.matches.iter().any(|m| m.id == "CRC-32/ISO-HDLC"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use hashsleuth_common as common;
pub use hashsleuth_crc as crc;
pub use hashsleuth_digest as digest;
pub use hashsleuth_find as find;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use hashsleuth_common::{Encoding, Expected, Sequence};
    pub use hashsleuth_crc::{Catalogue, Crc, CrcModel};
    pub use hashsleuth_digest::{Digest, DigestProvider, Registry};
    pub use hashsleuth_find::{
        search_algorithm, CancelToken, ChannelObserver, NullObserver, Outcome, SearchEvent,
        SearchObserver, SearchOptions, SearchOrchestrator, SearchReport, SearchRequest,
        StrategyKind,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
