//! Bitwise reference CRC computation.
//!
//! This is the table-free definition every other implementation in the crate
//! is checked against. It handles any width from 1 to 64 bits by feeding one
//! message bit at a time into the top of the register.

use crate::bits::{reflect, to_bytes, top_bit};
use crate::CrcModel;

/// Compute the CRC of `data` under `model`.
///
/// # Example
///
/// ```
/// use hashsleuth_crc::{compute, CrcModel};
///
/// let model: CrcModel = "32,04c11db7,ffffffff,true,true,ffffffff".parse()?;
/// assert_eq!(compute(&model, b"123456789"), 0xCBF43926);
/// # Ok::<(), hashsleuth_crc::Error>(())
/// ```
pub fn compute(model: &CrcModel, data: &[u8]) -> u64 {
    let register = absorb(model, model.init(), data, |_| {});
    let register = match model.length() {
        Some(length) => absorb(model, register, &length.encode(data.len() as u64), |_| {}),
        None => register,
    };
    finish(model, register)
}

/// Compute the CRC of `data` and return it as big-endian digest bytes.
pub fn compute_bytes(model: &CrcModel, data: &[u8]) -> Vec<u8> {
    to_bytes(compute(model, data), model.width())
}

/// Feed `data` into `register`, calling `step` with the register after every bit.
#[inline]
pub(crate) fn absorb<F>(model: &CrcModel, mut register: u64, data: &[u8], mut step: F) -> u64
where
    F: FnMut(u64),
{
    let top = top_bit(model.width());
    let mask = model.mask();
    let poly = model.poly();

    for &byte in data {
        let byte = if model.ref_in() { byte.reverse_bits() } else { byte };
        for shift in (0..8).rev() {
            let bit = (byte >> shift) & 1 == 1;
            let feedback = (register & top != 0) ^ bit;
            register = (register << 1) & mask;
            if feedback {
                register ^= poly;
            }
            step(register);
        }
    }

    register
}

/// Apply output reflection and the final XOR.
#[inline]
pub(crate) fn finish(model: &CrcModel, register: u64) -> u64 {
    let register = if model.ref_out() {
        reflect(register, model.width())
    } else {
        register
    };
    (register ^ model.xor_out()) & model.mask()
}
