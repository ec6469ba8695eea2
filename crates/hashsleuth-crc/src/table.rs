//! Table-driven CRC computation.
//!
//! [`Crc`] precomputes a 256-entry table for one model and then processes a
//! byte per lookup. Models with reflected input run a right-shifting register
//! holding the reflected CRC; all others run a left-shifting register aligned
//! to the top of a `u64`, which keeps widths below 8 bits working with the
//! same byte-wide table.

use crate::bits::{reflect, to_bytes};
use crate::engine::finish;
use crate::CrcModel;

/// A CRC model prepared for fast, incremental computation.
///
/// # Example
///
/// ```
/// use hashsleuth_crc::{Crc, CrcModel};
///
/// let model: CrcModel = "16,1021,ffff,false,false,0000".parse()?;
/// let mut crc = Crc::new(model);
/// crc.update(b"1234");
/// crc.update(b"56789");
/// assert_eq!(crc.finalize(), 0x29B1);
/// # Ok::<(), hashsleuth_crc::Error>(())
/// ```
#[derive(Clone)]
pub struct Crc {
    model: CrcModel,
    table: Box<[u64; 256]>,
    /// Reflected register when the model reflects input, top-aligned otherwise.
    register: u64,
    length: u64,
}

impl Crc {
    /// Prepare a model.
    pub fn new(model: CrcModel) -> Self {
        let table = build_table(&model);
        let register = initial_register(&model);
        Self {
            model,
            table,
            register,
            length: 0,
        }
    }

    /// The model this CRC computes.
    pub fn model(&self) -> &CrcModel {
        &self.model
    }

    /// The precomputed table, in the register orientation used internally.
    pub fn table(&self) -> &[u64; 256] {
        &self.table
    }

    /// Feed more data.
    pub fn update(&mut self, data: &[u8]) {
        self.register = self.absorb(self.register, data);
        self.length = self.length.wrapping_add(data.len() as u64);
    }

    /// The CRC of everything fed so far. Does not reset the state.
    pub fn finalize(&self) -> u64 {
        let mut register = self.register;
        if let Some(length) = self.model.length() {
            register = self.absorb(register, &length.encode(self.length));
        }
        finish(&self.model, self.normal_register(register))
    }

    /// The CRC of everything fed so far as big-endian bytes.
    pub fn finalize_bytes(&self) -> Vec<u8> {
        to_bytes(self.finalize(), self.model.width())
    }

    /// Return to the initial state.
    pub fn reset(&mut self) {
        self.register = initial_register(&self.model);
        self.length = 0;
    }

    /// One-shot computation that leaves the state untouched.
    pub fn checksum(&self, data: &[u8]) -> u64 {
        let mut crc = Self {
            model: self.model.clone(),
            table: self.table.clone(),
            register: initial_register(&self.model),
            length: 0,
        };
        crc.update(data);
        crc.finalize()
    }

    fn absorb(&self, mut register: u64, data: &[u8]) -> u64 {
        if self.model.ref_in() {
            for &byte in data {
                let index = ((register ^ u64::from(byte)) & 0xFF) as usize;
                register = (register >> 8) ^ self.table[index];
            }
        } else {
            for &byte in data {
                let index = (((register >> 56) ^ u64::from(byte)) & 0xFF) as usize;
                register = (register << 8) ^ self.table[index];
            }
        }
        register
    }

    /// Convert the internal register back to the bitwise engine's orientation.
    fn normal_register(&self, register: u64) -> u64 {
        let width = self.model.width();
        if self.model.ref_in() {
            reflect(register, width)
        } else {
            register >> (64 - width)
        }
    }
}

impl std::fmt::Debug for Crc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crc")
            .field("model", &self.model.to_string())
            .field("register", &format_args!("{:#x}", self.normal_register(self.register)))
            .field("length", &self.length)
            .finish()
    }
}

fn initial_register(model: &CrcModel) -> u64 {
    let width = model.width();
    if model.ref_in() {
        reflect(model.init(), width)
    } else {
        model.init() << (64 - width)
    }
}

fn build_table(model: &CrcModel) -> Box<[u64; 256]> {
    let width = model.width();
    let mut table = Box::new([0u64; 256]);

    if model.ref_in() {
        let poly = reflect(model.poly(), width);
        for (i, entry) in table.iter_mut().enumerate() {
            let mut value = i as u64;
            for _ in 0..8 {
                value = if value & 1 != 0 { (value >> 1) ^ poly } else { value >> 1 };
            }
            *entry = value;
        }
    } else {
        let poly = model.poly() << (64 - width);
        for (i, entry) in table.iter_mut().enumerate() {
            let mut value = (i as u64) << 56;
            for _ in 0..8 {
                value = if value & (1 << 63) != 0 { (value << 1) ^ poly } else { value << 1 };
            }
            *entry = value;
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute;

    const MODELS: &[&str] = &[
        "3,3,0,false,false,7",
        "5,05,1f,true,true,1f",
        "7,4f,7f,true,true,00",
        "8,07,00,false,false,00",
        "8,31,00,true,true,00",
        "12,80f,000,false,true,000",
        "16,1021,ffff,true,true,ffff",
        "16,8005,0000,false,false,0000",
        "24,864cfb,b704ce,false,false,000000",
        "32,04c11db7,0,false,false,ffffffff,true,false",
        "32,1edc6f41,ffffffff,true,true,ffffffff",
        "40,0004820009,0000000000,false,false,ffffffffff",
        "64,42f0e1eba9ea3693,0,false,false,0",
        "64,ad93d23594c93659,ffffffffffffffff,true,true,ffffffffffffffff",
    ];

    #[test]
    fn test_table_matches_bitwise() {
        let inputs: [&[u8]; 4] = [b"", b"123456789", b"\x00\xff\x80\x01", &[0xA5; 300]];
        for spec in MODELS {
            let model: CrcModel = spec.parse().unwrap();
            let crc = Crc::new(model.clone());
            for input in inputs {
                assert_eq!(crc.checksum(input), compute(&model, input), "model {spec}");
            }
        }
    }

    #[test]
    fn test_reflected_model_equals_mirrored_register() {
        // A reflected CRC is the plain CRC run on a mirrored register: the
        // right-shifting table over the reflected polynomial must agree with
        // the bitwise engine, which reflects each input byte instead.
        let reflected: CrcModel = "32,04c11db7,ffffffff,true,true,ffffffff".parse().unwrap();
        let crc = Crc::new(reflected.clone());
        assert_eq!(crc.table()[1], 0x7707_3096);
        assert_eq!(crc.table()[128], reflect(0x04C1_1DB7, 32));

        let plain: CrcModel = "32,04c11db7,ffffffff,false,false,ffffffff".parse().unwrap();
        let mirrored: Vec<u8> = b"123456789".iter().map(|b| b.reverse_bits()).collect();
        // Feeding pre-reflected bytes to the plain model is the same as
        // letting the reflected model reflect them, up to the output reflection.
        assert_eq!(
            reflect(compute(&plain, &mirrored) ^ 0xFFFF_FFFF, 32) ^ 0xFFFF_FFFF,
            compute(&reflected, b"123456789")
        );
    }

    #[test]
    fn test_incremental_updates() {
        let model: CrcModel = "32,04c11db7,ffffffff,true,true,ffffffff".parse().unwrap();
        let mut crc = Crc::new(model);
        for chunk in b"123456789".chunks(2) {
            crc.update(chunk);
        }
        assert_eq!(crc.finalize(), 0xCBF4_3926);
        assert_eq!(crc.finalize_bytes(), vec![0xCB, 0xF4, 0x39, 0x26]);

        crc.reset();
        crc.update(b"123456789");
        assert_eq!(crc.finalize(), 0xCBF4_3926);
    }

    #[test]
    fn test_length_is_tracked_across_updates() {
        let model: CrcModel = "32,04c11db7,0,false,false,ffffffff,true,false".parse().unwrap();
        let mut crc = Crc::new(model);
        crc.update(b"12345");
        crc.update(b"6789");
        assert_eq!(crc.finalize(), 930_766_865);
    }
}
