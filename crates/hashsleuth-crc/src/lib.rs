//! Parameterised CRC engine.
//!
//! This crate provides:
//!
//! - [`CrcModel`] - Rocksoft-style CRC parameters for widths 1 to 64
//! - [`compute`] - Bitwise reference computation
//! - [`Crc`] - Table-driven, incremental computation
//! - [`Catalogue`] - Embedded list of published CRC models
//! - [`bits`] - Masking and reflection helpers
//!
//! # Example
//!
//! ```
//! use hashsleuth_crc::{Catalogue, Crc};
//!
//! let entry = Catalogue::builtin()?.get("CRC-16/XMODEM").unwrap();
//! let crc = Crc::new(entry.model.clone());
//! assert_eq!(crc.checksum(b"123456789"), 0x31C3);
//! # Ok::<(), hashsleuth_crc::Error>(())
//! ```

mod catalogue;
mod engine;
mod error;
mod model;
mod table;

pub mod bits;

pub use catalogue::{Catalogue, CatalogueEntry, CHECK_INPUT};
pub use engine::{compute, compute_bytes};
pub use error::{Error, Result};
pub use model::{check_width, CrcModel, LengthInclusion};
pub use table::Crc;
