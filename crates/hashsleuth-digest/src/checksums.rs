//! Simple non-CRC checksums.
//!
//! These are the classic additive, rotating and multiplicative checksums
//! still found in file formats and Unix tools.

use crate::Digest;

/// Adler-32 (RFC 1950).
#[derive(Debug, Clone)]
pub struct Adler32 {
    a: u32,
    b: u32,
}

impl Adler32 {
    const MODULUS: u32 = 65521;
}

impl Default for Adler32 {
    fn default() -> Self {
        Self { a: 1, b: 0 }
    }
}

impl Digest for Adler32 {
    fn update(&mut self, data: &[u8]) {
        // 5552 is the largest n with 255n(n+1)/2 + (n+1)(MODULUS-1) < 2^32.
        for chunk in data.chunks(5552) {
            for &byte in chunk {
                self.a += u32::from(byte);
                self.b += self.a;
            }
            self.a %= Self::MODULUS;
            self.b %= Self::MODULUS;
        }
    }

    fn finalize(&self) -> Vec<u8> {
        ((self.b << 16) | self.a).to_be_bytes().to_vec()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn bits(&self) -> u32 {
        32
    }
}

/// Fletcher-16.
#[derive(Debug, Clone, Default)]
pub struct Fletcher16 {
    c0: u16,
    c1: u16,
}

impl Digest for Fletcher16 {
    fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.c0 = (self.c0 + u16::from(byte)) % 255;
            self.c1 = (self.c1 + self.c0) % 255;
        }
    }

    fn finalize(&self) -> Vec<u8> {
        ((self.c1 << 8) | self.c0).to_be_bytes().to_vec()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn bits(&self) -> u32 {
        16
    }
}

/// Plain byte sum truncated to `bits` (8, 16, 24 or 32).
#[derive(Debug, Clone)]
pub struct Sum {
    bits: u32,
    sum: u64,
}

impl Sum {
    /// Sum truncated to `bits`.
    pub fn new(bits: u32) -> Self {
        Self { bits, sum: 0 }
    }
}

impl Digest for Sum {
    fn update(&mut self, data: &[u8]) {
        let mask = (1u64 << self.bits) - 1;
        for &byte in data {
            self.sum = (self.sum + u64::from(byte)) & mask;
        }
    }

    fn finalize(&self) -> Vec<u8> {
        let len = (self.bits / 8) as usize;
        self.sum.to_be_bytes()[8 - len..].to_vec()
    }

    fn reset(&mut self) {
        self.sum = 0;
    }

    fn bits(&self) -> u32 {
        self.bits
    }
}

/// The UNIX System V `sum -s` checksum.
#[derive(Debug, Clone, Default)]
pub struct SysV {
    sum: u64,
}

impl Digest for SysV {
    fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.sum = self.sum.wrapping_add(u64::from(byte));
        }
    }

    fn finalize(&self) -> Vec<u8> {
        let s = self.sum & 0xFFFF_FFFF;
        let r = (s & 0xFFFF) + (s >> 16);
        let checksum = ((r & 0xFFFF) + (r >> 16)) as u16;
        checksum.to_be_bytes().to_vec()
    }

    fn reset(&mut self) {
        self.sum = 0;
    }

    fn bits(&self) -> u32 {
        16
    }
}

/// The BSD `sum` rotating checksum.
#[derive(Debug, Clone, Default)]
pub struct Bsd {
    checksum: u16,
}

impl Digest for Bsd {
    fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.checksum = self.checksum.rotate_right(1).wrapping_add(u16::from(byte));
        }
    }

    fn finalize(&self) -> Vec<u8> {
        self.checksum.to_be_bytes().to_vec()
    }

    fn reset(&mut self) {
        self.checksum = 0;
    }

    fn bits(&self) -> u32 {
        16
    }
}

/// The ELF symbol table hash (PJW hash).
#[derive(Debug, Clone, Default)]
pub struct Elf {
    hash: u32,
}

impl Digest for Elf {
    fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.hash = (self.hash << 4).wrapping_add(u32::from(byte));
            let high = self.hash & 0xF000_0000;
            if high != 0 {
                self.hash ^= high >> 24;
            }
            self.hash &= !high;
        }
    }

    fn finalize(&self) -> Vec<u8> {
        self.hash.to_be_bytes().to_vec()
    }

    fn reset(&mut self) {
        self.hash = 0;
    }

    fn bits(&self) -> u32 {
        32
    }
}

/// XOR of all bytes.
#[derive(Debug, Clone, Default)]
pub struct Xor8 {
    value: u8,
}

impl Digest for Xor8 {
    fn update(&mut self, data: &[u8]) {
        self.value = data.iter().fold(self.value, |acc, &b| acc ^ b);
    }

    fn finalize(&self) -> Vec<u8> {
        vec![self.value]
    }

    fn reset(&mut self) {
        self.value = 0;
    }

    fn bits(&self) -> u32 {
        8
    }
}

/// Fowler-Noll-Vo variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FnvVariant {
    /// FNV-0: offset basis zero, multiply then XOR.
    Fnv0,
    /// FNV-1: multiply then XOR.
    Fnv1,
    /// FNV-1a: XOR then multiply.
    Fnv1a,
}

/// FNV hash with 32 or 64 bit output.
#[derive(Debug, Clone)]
pub struct Fnv {
    bits: u32,
    variant: FnvVariant,
    hash: u64,
}

impl Fnv {
    /// FNV with 32 or 64 bit output.
    pub fn new(bits: u32, variant: FnvVariant) -> Self {
        let mut fnv = Self {
            bits,
            variant,
            hash: 0,
        };
        fnv.reset();
        fnv
    }

    fn prime(&self) -> u64 {
        if self.bits == 32 {
            0x0100_0193
        } else {
            0x0000_0100_0000_01B3
        }
    }

    fn offset_basis(&self) -> u64 {
        match (self.variant, self.bits) {
            (FnvVariant::Fnv0, _) => 0,
            (_, 32) => 0x811C_9DC5,
            _ => 0xCBF2_9CE4_8422_2325,
        }
    }

    fn mask(&self) -> u64 {
        u64::MAX >> (64 - self.bits)
    }
}

impl Digest for Fnv {
    fn update(&mut self, data: &[u8]) {
        let prime = self.prime();
        let mask = self.mask();
        for &byte in data {
            self.hash = match self.variant {
                FnvVariant::Fnv0 | FnvVariant::Fnv1 => {
                    (self.hash.wrapping_mul(prime) & mask) ^ u64::from(byte)
                }
                FnvVariant::Fnv1a => (self.hash ^ u64::from(byte)).wrapping_mul(prime) & mask,
            };
        }
    }

    fn finalize(&self) -> Vec<u8> {
        let len = (self.bits / 8) as usize;
        self.hash.to_be_bytes()[8 - len..].to_vec()
    }

    fn reset(&mut self) {
        self.hash = self.offset_basis();
    }

    fn bits(&self) -> u32 {
        self.bits
    }
}
