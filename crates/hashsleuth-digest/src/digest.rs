//! The streaming digest interface and its adapters for library hashes.

use hashsleuth_crc::Crc;
use xxhash_rust::{xxh3::Xxh3, xxh32::Xxh32, xxh64::Xxh64};

/// A streaming digest.
///
/// `finalize` does not consume or reset the state, so a digest can report
/// intermediate values and keep going.
pub trait Digest: Send {
    /// Feed more data.
    fn update(&mut self, data: &[u8]);

    /// The digest of everything fed so far, big-endian.
    fn finalize(&self) -> Vec<u8>;

    /// Return to the initial state.
    fn reset(&mut self);

    /// Output size in bits.
    fn bits(&self) -> u32;

    /// Natural input block size in bytes.
    fn block_size(&self) -> usize {
        1
    }

    /// Reset, hash `data` and return the digest.
    fn digest(&mut self, data: &[u8]) -> Vec<u8> {
        self.reset();
        self.update(data);
        self.finalize()
    }
}

impl Digest for Crc {
    fn update(&mut self, data: &[u8]) {
        Crc::update(self, data);
    }

    fn finalize(&self) -> Vec<u8> {
        self.finalize_bytes()
    }

    fn reset(&mut self) {
        Crc::reset(self);
    }

    fn bits(&self) -> u32 {
        self.model().width()
    }
}

/// CRC-32C through the `crc32c` crate, which uses SSE4.2/ARMv8 CRC
/// instructions when available.
#[derive(Debug, Clone, Default)]
pub struct Crc32c {
    state: u32,
}

impl Digest for Crc32c {
    fn update(&mut self, data: &[u8]) {
        self.state = crc32c::crc32c_append(self.state, data);
    }

    fn finalize(&self) -> Vec<u8> {
        self.state.to_be_bytes().to_vec()
    }

    fn reset(&mut self) {
        self.state = 0;
    }

    fn bits(&self) -> u32 {
        32
    }
}

/// A SHA-2 family hash from the `sha2` crate.
#[derive(Clone)]
pub struct Sha2<D> {
    inner: D,
    block_size: usize,
}

impl<D: sha2::Digest + Clone> Sha2<D> {
    /// Wrap a fresh hasher.
    pub fn new(block_size: usize) -> Self {
        Self {
            inner: <D as sha2::Digest>::new(),
            block_size,
        }
    }
}

impl<D> Digest for Sha2<D>
where
    D: sha2::Digest + Clone + Send,
{
    fn update(&mut self, data: &[u8]) {
        sha2::Digest::update(&mut self.inner, data);
    }

    fn finalize(&self) -> Vec<u8> {
        sha2::Digest::finalize(self.inner.clone()).to_vec()
    }

    fn reset(&mut self) {
        self.inner = <D as sha2::Digest>::new();
    }

    fn bits(&self) -> u32 {
        (<D as sha2::Digest>::output_size() * 8) as u32
    }

    fn block_size(&self) -> usize {
        self.block_size
    }
}

/// xxHash variants from `xxhash-rust`, seed 0, canonical (big-endian) output.
#[derive(Clone)]
pub enum XxHash {
    /// XXH32.
    Xxh32(Xxh32),
    /// XXH64.
    Xxh64(Xxh64),
    /// XXH3, 64-bit output.
    Xxh3_64(Xxh3),
    /// XXH3, 128-bit output.
    Xxh3_128(Xxh3),
}

impl XxHash {
    /// XXH32 with seed 0.
    pub fn xxh32() -> Self {
        XxHash::Xxh32(Xxh32::new(0))
    }

    /// XXH64 with seed 0.
    pub fn xxh64() -> Self {
        XxHash::Xxh64(Xxh64::new(0))
    }

    /// XXH3-64 with the default secret.
    pub fn xxh3_64() -> Self {
        XxHash::Xxh3_64(Xxh3::new())
    }

    /// XXH3-128 with the default secret.
    pub fn xxh3_128() -> Self {
        XxHash::Xxh3_128(Xxh3::new())
    }
}

impl Digest for XxHash {
    fn update(&mut self, data: &[u8]) {
        match self {
            XxHash::Xxh32(h) => h.update(data),
            XxHash::Xxh64(h) => h.update(data),
            XxHash::Xxh3_64(h) | XxHash::Xxh3_128(h) => h.update(data),
        }
    }

    fn finalize(&self) -> Vec<u8> {
        match self {
            XxHash::Xxh32(h) => h.digest().to_be_bytes().to_vec(),
            XxHash::Xxh64(h) => h.digest().to_be_bytes().to_vec(),
            XxHash::Xxh3_64(h) => h.digest().to_be_bytes().to_vec(),
            XxHash::Xxh3_128(h) => h.digest128().to_be_bytes().to_vec(),
        }
    }

    fn reset(&mut self) {
        match self {
            XxHash::Xxh32(h) => h.reset(0),
            XxHash::Xxh64(h) => h.reset(0),
            XxHash::Xxh3_64(h) | XxHash::Xxh3_128(h) => h.reset(),
        }
    }

    fn bits(&self) -> u32 {
        match self {
            XxHash::Xxh32(_) => 32,
            XxHash::Xxh64(_) | XxHash::Xxh3_64(_) => 64,
            XxHash::Xxh3_128(_) => 128,
        }
    }

    fn block_size(&self) -> usize {
        match self {
            XxHash::Xxh32(_) => 16,
            XxHash::Xxh64(_) => 32,
            XxHash::Xxh3_64(_) | XxHash::Xxh3_128(_) => 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashsleuth_crc::CrcModel;

    #[test]
    fn test_crc_digest() {
        let model: CrcModel = "32,04c11db7,ffffffff,true,true,ffffffff".parse().unwrap();
        let mut crc: Box<dyn Digest> = Box::new(Crc::new(model));
        assert_eq!(crc.digest(b"123456789"), vec![0xCB, 0xF4, 0x39, 0x26]);
        assert_eq!(crc.bits(), 32);
        assert_eq!(crc.block_size(), 1);
    }

    #[test]
    fn test_crc32c_matches_catalogue() {
        let mut crc = Crc32c::default();
        crc.update(b"12345");
        crc.update(b"6789");
        assert_eq!(crc.finalize(), 0xE306_9283u32.to_be_bytes().to_vec());
        crc.reset();
        assert_eq!(crc.finalize(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_sha256_known_vector() {
        let mut sha = Sha2::<sha2::Sha256>::new(64);
        let digest = sha.digest(b"abc");
        assert_eq!(
            digest,
            [
                0xba, 0x78, 0x16, 0xbf, 0x8f, 0x01, 0xcf, 0xea, 0x41, 0x41, 0x40, 0xde, 0x5d, 0xae,
                0x22, 0x23, 0xb0, 0x03, 0x61, 0xa3, 0x96, 0x17, 0x7a, 0x9c, 0xb4, 0x10, 0xff, 0x61,
                0xf2, 0x00, 0x15, 0xad,
            ]
        );
        assert_eq!(sha.bits(), 256);
        // finalize leaves the state alone
        assert_eq!(sha.finalize(), digest);
    }

    #[test]
    fn test_xxhash_reset_and_sizes() {
        for (mut h, bits) in [
            (XxHash::xxh32(), 32),
            (XxHash::xxh64(), 64),
            (XxHash::xxh3_64(), 64),
            (XxHash::xxh3_128(), 128),
        ] {
            let first = h.digest(b"hashsleuth");
            assert_eq!(first.len() * 8, bits as usize);
            assert_eq!(h.bits(), bits);
            assert_eq!(h.digest(b"hashsleuth"), first);
        }
    }
}
