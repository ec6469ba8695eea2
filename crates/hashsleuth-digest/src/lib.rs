//! Named digest algorithms.
//!
//! Everything here implements the streaming [`Digest`] trait, so a search
//! can run any of them over a candidate sequence without knowing what it is:
//!
//! - Parameterised CRCs from `hashsleuth-crc`
//! - CRC-32C, xxHash and SHA-2 through their library crates
//! - Classic checksums: Adler-32, Fletcher-16, byte sums, SysV, BSD, ELF, FNV
//!
//! [`Registry`] names them and is the usual way in.

mod checksums;
mod digest;
mod error;
mod registry;

pub use checksums::{Adler32, Bsd, Elf, Fletcher16, Fnv, FnvVariant, Sum, SysV, Xor8};
pub use digest::{Crc32c, Digest, Sha2, XxHash};
pub use error::{Error, Result};
pub use registry::{DigestProvider, Registry};
