//! Bit manipulation helpers for registers of 1 to 64 bits.
//!
//! All helpers take the width explicitly and never shift by 64, so they are
//! safe for the full width range.

use byteorder::{BigEndian, ByteOrder};

/// Smallest supported register width.
pub const MIN_WIDTH: u32 = 1;

/// Largest supported register width.
pub const MAX_WIDTH: u32 = 64;

/// Mask with the low `width` bits set.
#[inline]
pub const fn mask(width: u32) -> u64 {
    u64::MAX >> (64 - width)
}

/// Mask with only the top bit of a `width`-bit register set.
#[inline]
pub const fn top_bit(width: u32) -> u64 {
    1u64 << (width - 1)
}

/// Reverse the low `width` bits of `value`.
///
/// Bits above `width` are discarded.
#[inline]
pub const fn reflect(value: u64, width: u32) -> u64 {
    value.reverse_bits() >> (64 - width)
}

/// Number of bytes needed to hold a `width`-bit value.
#[inline]
pub const fn byte_len(width: u32) -> usize {
    width.div_ceil(8) as usize
}

/// Big-endian bytes of a `width`-bit value, using the minimal number of bytes.
pub fn to_bytes(value: u64, width: u32) -> Vec<u8> {
    let mut buf = [0u8; 8];
    BigEndian::write_u64(&mut buf, value);
    buf[8 - byte_len(width)..].to_vec()
}
