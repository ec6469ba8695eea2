//! CRC parameter sets.
//!
//! A [`CrcModel`] follows the Rocksoft/Williams parameter model: width,
//! polynomial (top bit implicit), initial register, input and output
//! reflection and a final XOR mask. Some published checksums such as POSIX
//! `cksum` additionally feed the message length through the register once
//! the data is done; that is described by [`LengthInclusion`].
//!
//! Models print and parse in the compact form
//! `width,poly,init,refIn,refOut,xorOut[,includeLength,lengthMsoFirst[,xorLength]]`
//! with hexadecimal values, e.g. `32,04c11db7,ffffffff,true,true,ffffffff`.

use std::fmt;
use std::str::FromStr;

use byteorder::{ByteOrder, LittleEndian};

use crate::bits::{byte_len, mask, MAX_WIDTH, MIN_WIDTH};
use crate::{Error, Result};

/// How the message length is mixed into the register after the data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LengthInclusion {
    /// Feed the most significant length byte first.
    pub ms_first: bool,
    /// Bytes XORed onto the encoded length before it is fed.
    pub xor: Vec<u8>,
}

impl LengthInclusion {
    /// Encode a message length (in bytes) the way it is fed into the register.
    ///
    /// The length uses as few bytes as possible (none for an empty message),
    /// zero-extended to the size of the XOR mask.
    pub fn encode(&self, len: u64) -> Vec<u8> {
        let mut buf = [0u8; 8];
        LittleEndian::write_u64(&mut buf, len);
        let used = 8 - (len.leading_zeros() as usize / 8);

        let mut bytes = buf[..used].to_vec();
        if bytes.len() < self.xor.len() {
            bytes.resize(self.xor.len(), 0);
        }
        if self.ms_first {
            bytes.reverse();
        }
        for (byte, x) in bytes.iter_mut().zip(&self.xor) {
            *byte ^= x;
        }
        bytes
    }
}

/// An immutable CRC parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrcModel {
    width: u32,
    poly: u64,
    init: u64,
    ref_in: bool,
    ref_out: bool,
    xor_out: u64,
    length: Option<LengthInclusion>,
}

impl CrcModel {
    /// Create a model. `poly`, `init` and `xor_out` are masked to `width` bits.
    ///
    /// # Example
    ///
    /// ```
    /// use hashsleuth_crc::CrcModel;
    ///
    /// let xmodem = CrcModel::new(16, 0x1021, 0, false, false, 0)?;
    /// assert_eq!(xmodem.to_string(), "16,1021,0000,false,false,0000");
    /// # Ok::<(), hashsleuth_crc::Error>(())
    /// ```
    pub fn new(
        width: u32,
        poly: u64,
        init: u64,
        ref_in: bool,
        ref_out: bool,
        xor_out: u64,
    ) -> Result<Self> {
        check_width(width, MIN_WIDTH, MAX_WIDTH)?;
        let m = mask(width);

        Ok(Self {
            width,
            poly: poly & m,
            init: init & m,
            ref_in,
            ref_out,
            xor_out: xor_out & m,
            length: None,
        })
    }

    /// Mix the message length into the register after the data.
    pub fn with_length(mut self, length: LengthInclusion) -> Self {
        self.length = Some(length);
        self
    }

    /// Register width in bits.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Generator polynomial without its implicit top bit.
    #[inline]
    pub const fn poly(&self) -> u64 {
        self.poly
    }

    /// Initial register value.
    #[inline]
    pub const fn init(&self) -> u64 {
        self.init
    }

    /// Whether input bytes are processed least significant bit first.
    #[inline]
    pub const fn ref_in(&self) -> bool {
        self.ref_in
    }

    /// Whether the final register is reflected before the XOR.
    #[inline]
    pub const fn ref_out(&self) -> bool {
        self.ref_out
    }

    /// Final XOR mask.
    #[inline]
    pub const fn xor_out(&self) -> u64 {
        self.xor_out
    }

    /// Length inclusion, if any.
    #[inline]
    pub fn length(&self) -> Option<&LengthInclusion> {
        self.length.as_ref()
    }

    /// Mask covering the register.
    #[inline]
    pub const fn mask(&self) -> u64 {
        mask(self.width)
    }

    /// Number of bytes in a digest produced by this model.
    #[inline]
    pub const fn digest_len(&self) -> usize {
        byte_len(self.width)
    }
}

/// Check that `width` lies within `min..=max`.
pub fn check_width(width: u32, min: u32, max: u32) -> Result<()> {
    if (min..=max).contains(&width) {
        Ok(())
    } else {
        Err(Error::UnsupportedWidth { width, min, max })
    }
}

impl fmt::Display for CrcModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = byte_len(self.width) * 2;
        write!(
            f,
            "{},{:0digits$x},{:0digits$x},{},{},{:0digits$x}",
            self.width, self.poly, self.init, self.ref_in, self.ref_out, self.xor_out
        )?;
        if let Some(length) = &self.length {
            write!(f, ",true,{}", length.ms_first)?;
            if !length.xor.is_empty() {
                write!(f, ",")?;
                for byte in &length.xor {
                    write!(f, "{byte:02x}")?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for CrcModel {
    type Err = Error;

    /// Parse `width,poly,init,refIn,refOut,xorOut[,includeLength,lengthMsoFirst[,xorLength]]`,
    /// optionally prefixed by `crc:`.
    fn from_str(s: &str) -> Result<Self> {
        let body = s.trim();
        let body = body
            .strip_prefix("crc:")
            .or_else(|| body.strip_prefix("CRC:"))
            .unwrap_or(body);
        let fields: Vec<&str> = body.split(',').map(str::trim).collect();

        if !matches!(fields.len(), 6 | 8 | 9) {
            return Err(Error::InvalidModel(format!(
                "expected 6, 8 or 9 comma separated fields in {s:?}, got {}",
                fields.len()
            )));
        }

        let width: u32 = fields[0]
            .parse()
            .map_err(|_| Error::InvalidModel(format!("width {:?} is not a number", fields[0])))?;
        check_width(width, MIN_WIDTH, MAX_WIDTH)?;

        let poly = parse_value(fields[1], "poly", width)?;
        let init = parse_value(fields[2], "init", width)?;
        let ref_in = parse_bool(fields[3], "refIn")?;
        let ref_out = parse_bool(fields[4], "refOut")?;
        let xor_out = parse_value(fields[5], "xorOut", width)?;

        let model = Self::new(width, poly, init, ref_in, ref_out, xor_out)?;
        if fields.len() == 6 || !parse_bool(fields[6], "includeLength")? {
            return Ok(model);
        }

        let ms_first = parse_bool(fields[7], "lengthMsoFirst")?;
        let xor = match fields.get(8) {
            Some(hex) => parse_hex_bytes(hex)?,
            None => Vec::new(),
        };
        Ok(model.with_length(LengthInclusion { ms_first, xor }))
    }
}

fn parse_value(field: &str, name: &str, width: u32) -> Result<u64> {
    let digits = field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
        .unwrap_or(field);
    let value = u64::from_str_radix(digits, 16)
        .map_err(|_| Error::InvalidModel(format!("{name} {field:?} is not a hex number")))?;
    if value & !mask(width) != 0 {
        return Err(Error::InvalidModel(format!(
            "{name} {field:?} does not fit in {width} bits"
        )));
    }
    Ok(value)
}

fn parse_bool(field: &str, name: &str) -> Result<bool> {
    match field.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Error::InvalidModel(format!("{name} {field:?} is not true or false"))),
    }
}

fn parse_hex_bytes(field: &str) -> Result<Vec<u8>> {
    if field.len() % 2 != 0 {
        return Err(Error::InvalidModel(format!("xorLength {field:?} has an odd number of digits")));
    }
    (0..field.len())
        .step_by(2)
        .map(|i| {
            field
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| Error::InvalidModel(format!("xorLength {field:?} is not hex")))
        })
        .collect()
}

#[cfg(feature = "serde")]
impl serde::Serialize for CrcModel {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CrcModel {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_are_masked() {
        let model = CrcModel::new(8, 0x1FF, 0xABCD, false, false, 0x100).unwrap();
        assert_eq!(model.poly(), 0xFF);
        assert_eq!(model.init(), 0xCD);
        assert_eq!(model.xor_out(), 0x00);
    }

    #[test]
    fn test_width_is_validated() {
        assert!(matches!(
            CrcModel::new(0, 0, 0, false, false, 0),
            Err(Error::UnsupportedWidth { width: 0, .. })
        ));
        assert!(CrcModel::new(65, 0, 0, false, false, 0).is_err());
        assert!(CrcModel::new(64, u64::MAX, u64::MAX, true, true, u64::MAX).is_ok());
    }

    #[test]
    fn test_parse_and_display() {
        let model: CrcModel = "crc:32,04C11DB7,FFFFFFFF,true,true,FFFFFFFF".parse().unwrap();
        assert_eq!(model.width(), 32);
        assert_eq!(model.poly(), 0x04C1_1DB7);
        assert!(model.ref_in() && model.ref_out());
        assert_eq!(model.to_string(), "32,04c11db7,ffffffff,true,true,ffffffff");
        assert_eq!(model.to_string().parse::<CrcModel>().unwrap(), model);
    }

    #[test]
    fn test_parse_length_fields() {
        let model: CrcModel = "32,04c11db7,0,false,false,ffffffff,true,false".parse().unwrap();
        assert_eq!(model.length(), Some(&LengthInclusion::default()));

        let model: CrcModel = "16,1021,0,false,false,0,true,true,ff00".parse().unwrap();
        let length = model.length().unwrap();
        assert!(length.ms_first);
        assert_eq!(length.xor, vec![0xFF, 0x00]);
        assert_eq!(model.to_string(), "16,1021,0000,false,false,0000,true,true,ff00");

        let model: CrcModel = "16,1021,0,false,false,0,false,false".parse().unwrap();
        assert!(model.length().is_none());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("32,04c11db7".parse::<CrcModel>().is_err());
        assert!("x,1,0,false,false,0".parse::<CrcModel>().is_err());
        assert!("8,1ff,0,false,false,0".parse::<CrcModel>().is_err());
        assert!("8,07,0,yes,false,0".parse::<CrcModel>().is_err());
        assert!("8,07,0,false,false,0,true,false,abc".parse::<CrcModel>().is_err());
    }

    #[test]
    fn test_length_encoding() {
        let lsb = LengthInclusion::default();
        assert_eq!(lsb.encode(0), Vec::<u8>::new());
        assert_eq!(lsb.encode(9), vec![0x09]);
        assert_eq!(lsb.encode(0x1234), vec![0x34, 0x12]);

        let msb = LengthInclusion { ms_first: true, xor: vec![0xFF, 0xFF, 0xFF] };
        assert_eq!(msb.encode(0x1234), vec![0xFF, 0xED, 0xCB]);
    }
}
