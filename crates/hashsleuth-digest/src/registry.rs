//! Named digest algorithms.
//!
//! [`DigestProvider`] is what the search engines see: an ordered list of
//! algorithm ids with descriptions, and a way to create a fresh digest for
//! any listed id. [`Registry`] is the built-in provider.

use std::collections::BTreeMap;

use hashsleuth_crc::{Catalogue, Crc, CrcModel};

use crate::checksums::{Adler32, Bsd, Elf, Fletcher16, Fnv, FnvVariant, Sum, SysV, Xor8};
use crate::digest::{Crc32c, Sha2, XxHash};
use crate::{Digest, Error, Result};

/// A source of named digest algorithms.
pub trait DigestProvider: Sync {
    /// Algorithm ids and descriptions, optionally only those producing `bits`-bit digests.
    fn list_algorithms(&self, bits: Option<u32>) -> BTreeMap<String, String>;

    /// Create a fresh digest for `id`.
    fn instantiate(&self, id: &str) -> Result<Box<dyn Digest>>;
}

/// How to build a digest for a registered algorithm.
#[derive(Clone)]
enum Factory {
    Crc(CrcModel),
    Native(fn() -> Box<dyn Digest>),
}

#[derive(Clone)]
struct Algorithm {
    description: String,
    bits: u32,
    factory: Factory,
}

/// The built-in set of digest algorithms.
///
/// Besides the listed ids, [`DigestProvider::instantiate`] also accepts any
/// catalogue CRC by name and any `crc:` parameter string.
///
/// # Example
///
/// ```
/// use hashsleuth_digest::{DigestProvider, Registry};
///
/// let registry = Registry::builtin()?;
/// let mut crc = registry.instantiate("crc32")?;
/// assert_eq!(crc.digest(b"123456789"), vec![0xCB, 0xF4, 0x39, 0x26]);
///
/// let sixteen = registry.list_algorithms(Some(16));
/// assert!(sixteen.contains_key("fletcher16"));
/// # Ok::<(), hashsleuth_digest::Error>(())
/// ```
#[derive(Clone)]
pub struct Registry {
    algorithms: BTreeMap<String, Algorithm>,
    catalogue: &'static Catalogue,
}

/// Short names for well-known CRCs, as used by common tools.
const CRC_ALIASES: &[(&str, &str)] = &[
    ("crc8", "CRC-8/SMBUS"),
    ("crc16", "CRC-16/ARC"),
    ("crc16_x25", "CRC-16/IBM-SDLC"),
    ("crc16_xmodem", "CRC-16/XMODEM"),
    ("crc24", "CRC-24/OPENPGP"),
    ("crc32", "CRC-32/ISO-HDLC"),
    ("crc32_bzip2", "CRC-32/BZIP2"),
    ("crc32_mpeg2", "CRC-32/MPEG-2"),
    ("crc64", "CRC-64/ECMA-182"),
    ("crc64_xz", "CRC-64/XZ"),
    ("cksum", "POSIX-CKSUM"),
];

impl Registry {
    /// Every built-in algorithm.
    pub fn builtin() -> Result<Self> {
        let catalogue = Catalogue::builtin()?;
        let mut registry = Self {
            algorithms: BTreeMap::new(),
            catalogue,
        };

        for (alias, id) in CRC_ALIASES {
            let entry = catalogue
                .get(id)
                .ok_or_else(|| Error::UnknownAlgorithm(format!("{alias} -> {id}")))?;
            registry.insert_crc(alias, &format!("{} ({})", entry.id, entry.description), entry.model.clone());
        }

        registry.insert("crc32c", "CRC-32C (Castagnoli), hardware accelerated", 32, || {
            Box::new(Crc32c::default())
        });
        registry.insert("adler32", "Adler-32, RFC 1950", 32, || Box::new(Adler32::default()));
        registry.insert("fletcher16", "Fletcher-16", 16, || Box::new(Fletcher16::default()));
        registry.insert("sum8", "Byte sum modulo 2^8", 8, || Box::new(Sum::new(8)));
        registry.insert("sum16", "Byte sum modulo 2^16", 16, || Box::new(Sum::new(16)));
        registry.insert("sum24", "Byte sum modulo 2^24", 24, || Box::new(Sum::new(24)));
        registry.insert("sum32", "Byte sum modulo 2^32", 32, || Box::new(Sum::new(32)));
        registry.insert("sysv", "UNIX System V sum", 16, || Box::new(SysV::default()));
        registry.insert("bsd", "BSD sum", 16, || Box::new(Bsd::default()));
        registry.insert("elf", "ELF symbol hash", 32, || Box::new(Elf::default()));
        registry.insert("xor8", "XOR of all bytes", 8, || Box::new(Xor8::default()));
        registry.insert("fnv-0_32", "FNV-0, 32 bit", 32, || Box::new(Fnv::new(32, FnvVariant::Fnv0)));
        registry.insert("fnv-1_32", "FNV-1, 32 bit", 32, || Box::new(Fnv::new(32, FnvVariant::Fnv1)));
        registry.insert("fnv-1a_32", "FNV-1a, 32 bit", 32, || Box::new(Fnv::new(32, FnvVariant::Fnv1a)));
        registry.insert("fnv-0_64", "FNV-0, 64 bit", 64, || Box::new(Fnv::new(64, FnvVariant::Fnv0)));
        registry.insert("fnv-1_64", "FNV-1, 64 bit", 64, || Box::new(Fnv::new(64, FnvVariant::Fnv1)));
        registry.insert("fnv-1a_64", "FNV-1a, 64 bit", 64, || Box::new(Fnv::new(64, FnvVariant::Fnv1a)));
        registry.insert("xxh32", "xxHash XXH32, seed 0", 32, || Box::new(XxHash::xxh32()));
        registry.insert("xxh64", "xxHash XXH64, seed 0", 64, || Box::new(XxHash::xxh64()));
        registry.insert("xxh3_64", "xxHash XXH3, 64 bit", 64, || Box::new(XxHash::xxh3_64()));
        registry.insert("xxh3_128", "xxHash XXH3, 128 bit", 128, || Box::new(XxHash::xxh3_128()));
        registry.insert("sha224", "SHA-224, FIPS 180-4", 224, || {
            Box::new(Sha2::<sha2::Sha224>::new(64))
        });
        registry.insert("sha256", "SHA-256, FIPS 180-4", 256, || {
            Box::new(Sha2::<sha2::Sha256>::new(64))
        });
        registry.insert("sha384", "SHA-384, FIPS 180-4", 384, || {
            Box::new(Sha2::<sha2::Sha384>::new(128))
        });
        registry.insert("sha512", "SHA-512, FIPS 180-4", 512, || {
            Box::new(Sha2::<sha2::Sha512>::new(128))
        });
        registry.insert("sha512_224", "SHA-512/224, FIPS 180-4", 224, || {
            Box::new(Sha2::<sha2::Sha512_224>::new(128))
        });
        registry.insert("sha512_256", "SHA-512/256, FIPS 180-4", 256, || {
            Box::new(Sha2::<sha2::Sha512_256>::new(128))
        });

        Ok(registry)
    }

    /// Register a CRC under `id`.
    pub fn insert_crc(&mut self, id: &str, description: &str, model: CrcModel) {
        self.algorithms.insert(
            id.to_string(),
            Algorithm {
                description: description.to_string(),
                bits: model.width(),
                factory: Factory::Crc(model),
            },
        );
    }

    /// Register an algorithm built by `factory`.
    pub fn insert(&mut self, id: &str, description: &str, bits: u32, factory: fn() -> Box<dyn Digest>) {
        self.algorithms.insert(
            id.to_string(),
            Algorithm {
                description: description.to_string(),
                bits,
                factory: Factory::Native(factory),
            },
        );
    }

    /// The CRC catalogue backing this registry.
    pub fn catalogue(&self) -> &'static Catalogue {
        self.catalogue
    }

    /// Number of listed algorithms.
    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    /// Whether no algorithms are listed.
    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}

impl DigestProvider for Registry {
    fn list_algorithms(&self, bits: Option<u32>) -> BTreeMap<String, String> {
        self.algorithms
            .iter()
            .filter(|(_, algorithm)| bits.map_or(true, |b| algorithm.bits == b))
            .map(|(id, algorithm)| (id.clone(), algorithm.description.clone()))
            .collect()
    }

    fn instantiate(&self, id: &str) -> Result<Box<dyn Digest>> {
        if let Some(algorithm) = self.algorithms.get(id) {
            return Ok(match &algorithm.factory {
                Factory::Crc(model) => Box::new(Crc::new(model.clone())),
                Factory::Native(factory) => factory(),
            });
        }

        if let Some(entry) = self.catalogue.get(id) {
            return Ok(Box::new(Crc::new(entry.model.clone())));
        }

        if id.starts_with("crc:") || id.starts_with("CRC:") {
            let model: CrcModel = id.parse()?;
            return Ok(Box::new(Crc::new(model)));
        }

        Err(Error::UnknownAlgorithm(id.to_string()))
    }
}
