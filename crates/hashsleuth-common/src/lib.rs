//! Common utilities for hashsleuth.
//!
//! This crate provides the foundational types shared by all hashsleuth crates:
//!
//! - [`Sequence`] - Literal byte sequences given as `txt:`, `hex:`, `dec:` and friends
//! - [`Encoding`] - Textual representations of digests (hex, Base64, Z85, ...)
//! - [`Expected`] - An expected digest and the policy used to compare against it

mod encoding;
mod error;
mod expected;
mod sequence;

pub use encoding::Encoding;
pub use error::{Error, Result};
pub use expected::{compare_text, Expected};
pub use sequence::Sequence;
