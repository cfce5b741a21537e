//! Packed navigation message and bit field codec.
//!
//! Navigation messages are packed MSB first: bit 0 is the most significant
//! bit of the first byte. Fields are described by [Field] constants, which
//! may be split in several parts that concatenate in the listed order.
use crate::{
    constants::PI,
    error::DecodeError,
    prelude::{Constellation, Epoch, TimeScale, SV},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Navigation frame types supported by the decoders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NavType {
    /// GPS legacy navigation message, 300 bit subframes
    GpsLNav,
    /// Galileo I/NAV, 128 bit words
    GalINav,
    /// BeiDou D1, 300 bit subframes
    BdsD1,
}

impl NavType {
    /// [Constellation] broadcasting this frame type
    pub fn constellation(&self) -> Constellation {
        match self {
            Self::GpsLNav => Constellation::GPS,
            Self::GalINav => Constellation::Galileo,
            Self::BdsD1 => Constellation::BeiDou,
        }
    }
    /// [TimeScale] in which this frame type expresses time
    pub fn timescale(&self) -> TimeScale {
        match self {
            Self::GpsLNav => TimeScale::GPST,
            Self::GalINav => TimeScale::GST,
            Self::BdsD1 => TimeScale::BDT,
        }
    }
}

impl std::fmt::Display for NavType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::GpsLNav => write!(f, "GPS-LNAV"),
            Self::GalINav => write!(f, "GAL-INAV"),
            Self::BdsD1 => write!(f, "BDS-D1"),
        }
    }
}

/// Scaling applied to the raw integer value of a [Field]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    Unit,
    /// Power of two scale factor
    Pow2(i32),
    Factor(f64),
}

impl Scale {
    pub fn factor(&self) -> f64 {
        match self {
            Self::Unit => 1.0,
            Self::Pow2(exp) => 2.0_f64.powi(*exp),
            Self::Factor(f) => *f,
        }
    }
}

/// Bit field descriptor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    /// (start, count) parts, MSB part first
    pub parts: &'static [(usize, usize)],
    /// Two's complement encoding
    pub signed: bool,
    pub scale: Scale,
    /// Scaled value is expressed in semicircles and converted to radians
    pub semicircles: bool,
}

impl Field {
    /// Unsigned field, unit scale
    pub const fn unsigned(parts: &'static [(usize, usize)]) -> Self {
        Self {
            parts,
            signed: false,
            scale: Scale::Unit,
            semicircles: false,
        }
    }
    /// Two's complement field, unit scale
    pub const fn signed(parts: &'static [(usize, usize)]) -> Self {
        Self {
            parts,
            signed: true,
            scale: Scale::Unit,
            semicircles: false,
        }
    }
    /// Copies and applies a 2^exp scale factor
    pub const fn pow2(self, exp: i32) -> Self {
        Self {
            scale: Scale::Pow2(exp),
            ..self
        }
    }
    /// Copies and applies a multiplicative scale factor
    pub const fn factor(self, factor: f64) -> Self {
        Self {
            scale: Scale::Factor(factor),
            ..self
        }
    }
    /// Copies and marks the field as semicircles
    pub const fn semicircles(self) -> Self {
        Self {
            semicircles: true,
            ..self
        }
    }
    /// Total number of bits
    pub fn bit_count(&self) -> usize {
        self.parts.iter().map(|(_, count)| count).sum()
    }
    fn unit_factor(&self) -> f64 {
        if self.semicircles {
            self.scale.factor() * PI
        } else {
            self.scale.factor()
        }
    }
}

/// Packed navigation message, as transmitted by one [SV]
#[derive(Debug, Clone, PartialEq)]
pub struct PackedMessage {
    sv: SV,
    nav: NavType,
    xmit: Epoch,
    bytes: Vec<u8>,
    bit_len: usize,
}

fn mask(count: usize) -> u64 {
    if count >= 64 {
        u64::MAX
    } else {
        (1_u64 << count) - 1
    }
}

impl PackedMessage {
    /// Wraps `bytes`, of which `bit_len` bits are meaningful.
    /// `xmit` is the transmission time of the first bit.
    pub fn new(
        sv: SV,
        nav: NavType,
        xmit: Epoch,
        bytes: Vec<u8>,
        bit_len: usize,
    ) -> Result<Self, DecodeError> {
        if bit_len > bytes.len() * 8 {
            return Err(DecodeError::InvalidParameter(
                "bit length exceeds buffer size",
            ));
        }
        Ok(Self {
            sv,
            nav,
            xmit,
            bytes,
            bit_len,
        })
    }
    /// Builds a message of `bit_len` bits, all cleared
    pub fn zeroed(sv: SV, nav: NavType, xmit: Epoch, bit_len: usize) -> Self {
        Self {
            sv,
            nav,
            xmit,
            bytes: vec![0; (bit_len + 7) / 8],
            bit_len,
        }
    }
    /// Packs words of `bits_per_word` bits each, right justified
    /// in their `u32` container (for example 10 LNAV 30 bit words).
    pub fn from_words(
        sv: SV,
        nav: NavType,
        xmit: Epoch,
        words: &[u32],
        bits_per_word: usize,
    ) -> Result<Self, DecodeError> {
        if bits_per_word == 0 || bits_per_word > 32 {
            return Err(DecodeError::InvalidParameter("word size"));
        }
        let mut msg = Self::zeroed(sv, nav, xmit, words.len() * bits_per_word);
        for (i, word) in words.iter().enumerate() {
            msg.insert_unsigned(i * bits_per_word, bits_per_word, *word as u64)?;
        }
        Ok(msg)
    }
    pub fn sv(&self) -> SV {
        self.sv
    }
    pub fn nav_type(&self) -> NavType {
        self.nav
    }
    /// Transmission time of the first bit
    pub fn xmit(&self) -> Epoch {
        self.xmit
    }
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
    fn check_range(&self, start: usize, count: usize) -> Result<(), DecodeError> {
        if count > 64 || start + count > self.bit_len {
            Err(DecodeError::OutOfRange {
                start,
                count,
                len: self.bit_len,
            })
        } else {
            Ok(())
        }
    }
    fn bit(&self, index: usize) -> bool {
        (self.bytes[index / 8] >> (7 - index % 8)) & 0x01 > 0
    }
    fn set_bit(&mut self, index: usize, value: bool) {
        let b = 0x80 >> (index % 8);
        if value {
            self.bytes[index / 8] |= b;
        } else {
            self.bytes[index / 8] &= !b;
        }
    }
    /// Extracts `count` bits starting at `start`, as unsigned integer
    pub fn unsigned(&self, start: usize, count: usize) -> Result<u64, DecodeError> {
        self.check_range(start, count)?;
        Ok((start..start + count).fold(0_u64, |acc, i| (acc << 1) | self.bit(i) as u64))
    }
    /// Extracts `count` bits starting at `start`, as two's complement integer
    pub fn signed(&self, start: usize, count: usize) -> Result<i64, DecodeError> {
        let raw = self.unsigned(start, count)?;
        Ok(sign_extend(raw, count))
    }
    /// Extracts and concatenates all parts of this [Field]
    pub fn raw(&self, field: &Field) -> Result<u64, DecodeError> {
        let total = field.bit_count();
        if total > 64 {
            let (start, count) = field.parts.first().copied().unwrap_or_default();
            return Err(DecodeError::OutOfRange {
                start,
                count: total.max(count),
                len: self.bit_len,
            });
        }
        let mut value = 0_u64;
        for (start, count) in field.parts {
            let part = self.unsigned(*start, *count)?;
            value = if *count >= 64 { part } else { (value << count) | part };
        }
        Ok(value)
    }
    /// Extracts this [Field] and applies its scaling
    pub fn value(&self, field: &Field) -> Result<f64, DecodeError> {
        let raw = self.raw(field)?;
        let value = if field.signed {
            sign_extend(raw, field.bit_count()) as f64
        } else {
            raw as f64
        };
        Ok(value * field.unit_factor())
    }
    /// Writes `value` over `count` bits starting at `start`
    pub fn insert_unsigned(
        &mut self,
        start: usize,
        count: usize,
        value: u64,
    ) -> Result<(), DecodeError> {
        self.check_range(start, count)?;
        if value & !mask(count) > 0 {
            return Err(DecodeError::InvalidParameter("value does not fit"));
        }
        for i in 0..count {
            let bit = (value >> (count - 1 - i)) & 0x01 > 0;
            self.set_bit(start + i, bit);
        }
        Ok(())
    }
    /// Writes `value` as two's complement over `count` bits
    pub fn insert_signed(
        &mut self,
        start: usize,
        count: usize,
        value: i64,
    ) -> Result<(), DecodeError> {
        if count == 0 || count > 64 {
            return Err(DecodeError::OutOfRange {
                start,
                count,
                len: self.bit_len,
            });
        }
        if count < 64 {
            let half = 1_i64 << (count - 1);
            if value < -half || value >= half {
                return Err(DecodeError::InvalidParameter("value does not fit"));
            }
        }
        self.insert_unsigned(start, count, value as u64 & mask(count))
    }
    /// Quantizes `value` (in the [Field] units) and writes it,
    /// splitting over all parts.
    pub fn insert(&mut self, field: &Field, value: f64) -> Result<(), DecodeError> {
        let total = field.bit_count();
        if total == 0 || total > 64 {
            return Err(DecodeError::InvalidParameter("field size"));
        }
        let quantized = (value / field.unit_factor()).round();
        let raw = if field.signed {
            let half = 2.0_f64.powi(total as i32 - 1);
            if quantized < -half || quantized >= half {
                return Err(DecodeError::InvalidParameter("value does not fit"));
            }
            (quantized as i64) as u64 & mask(total)
        } else {
            if quantized < 0.0 || quantized >= 2.0_f64.powi(total as i32) {
                return Err(DecodeError::InvalidParameter("value does not fit"));
            }
            quantized as u64
        };
        let mut remaining = total;
        for (start, count) in field.parts {
            remaining -= count;
            let part = if remaining >= 64 { 0 } else { raw >> remaining };
            self.insert_unsigned(*start, *count, part & mask(*count))?;
        }
        Ok(())
    }
}

fn sign_extend(raw: u64, count: usize) -> i64 {
    if count == 0 {
        0
    } else if count >= 64 {
        raw as i64
    } else if (raw >> (count - 1)) & 0x01 > 0 {
        (raw | !mask(count)) as i64
    } else {
        raw as i64
    }
}

#[cfg(test)]
mod test {
    use super::*;
    fn message() -> PackedMessage {
        PackedMessage::new(
            SV::new(Constellation::GPS, 1),
            NavType::GpsLNav,
            Epoch::from_gregorian_utc_at_midnight(2020, 1, 1),
            vec![0x8B, 0x00, 0xF0, 0x0F, 0xFF],
            36,
        )
        .unwrap()
    }
    #[test]
    fn unsigned_extraction() {
        let msg = message();
        assert_eq!(msg.unsigned(0, 8).unwrap(), 0x8B);
        assert_eq!(msg.unsigned(0, 4).unwrap(), 0x8);
        assert_eq!(msg.unsigned(4, 8).unwrap(), 0xB0);
        assert_eq!(msg.unsigned(16, 4).unwrap(), 0xF);
        assert_eq!(msg.unsigned(32, 4).unwrap(), 0xF);
        assert_eq!(msg.unsigned(0, 0).unwrap(), 0);
    }
    #[test]
    fn signed_extraction() {
        let msg = message();
        assert_eq!(msg.signed(0, 8).unwrap(), -117);
        assert_eq!(msg.signed(16, 4).unwrap(), -1);
        assert_eq!(msg.signed(20, 8).unwrap(), 0);
        assert_eq!(msg.signed(28, 8).unwrap(), -1);
        assert_eq!(msg.signed(4, 4).unwrap(), -5);
    }
    #[test]
    fn out_of_range() {
        let msg = message();
        assert_eq!(
            msg.unsigned(30, 7),
            Err(DecodeError::OutOfRange {
                start: 30,
                count: 7,
                len: 36
            })
        );
        assert!(msg.unsigned(0, 65).is_err());
        assert!(PackedMessage::new(
            SV::new(Constellation::GPS, 1),
            NavType::GpsLNav,
            Epoch::from_gregorian_utc_at_midnight(2020, 1, 1),
            vec![0; 2],
            17,
        )
        .is_err());
    }
    #[test]
    fn split_fields() {
        const SPLIT: Field = Field::signed(&[(16, 4), (32, 4)]);
        let msg = message();
        assert_eq!(msg.raw(&SPLIT).unwrap(), 0xFF);
        assert_eq!(msg.value(&SPLIT).unwrap(), -1.0);
        const SCALED: Field = Field::unsigned(&[(0, 8)]).pow2(-2);
        assert_eq!(msg.value(&SCALED).unwrap(), 0x8B as f64 / 4.0);
        const ANGLE: Field = Field::signed(&[(16, 4)]).pow2(-1).semicircles();
        assert_eq!(msg.value(&ANGLE).unwrap(), -0.5 * PI);
    }
    #[test]
    fn insertion() {
        const SPLIT: Field = Field::signed(&[(3, 5), (20, 7)]).pow2(-10);
        let mut msg = PackedMessage::zeroed(
            SV::new(Constellation::Galileo, 3),
            NavType::GalINav,
            Epoch::from_gregorian_utc_at_midnight(2020, 1, 1),
            40,
        );
        msg.insert(&SPLIT, -1.5).unwrap();
        assert_eq!(msg.value(&SPLIT).unwrap(), -1.5);
        assert_eq!(msg.unsigned(0, 3).unwrap(), 0);
        msg.insert_unsigned(30, 10, 1000).unwrap();
        assert_eq!(msg.unsigned(30, 10).unwrap(), 1000);
        assert!(msg.insert_unsigned(30, 10, 1024).is_err());
        assert!(msg.insert(&SPLIT, 100.0).is_err());
        msg.insert_signed(0, 3, -4).unwrap();
        assert_eq!(msg.signed(0, 3).unwrap(), -4);
        assert!(msg.insert_signed(0, 3, 4).is_err());
    }
    #[test]
    fn words() {
        let words = [(0x8B_u32 << 22) | 0x3FF, 0x3FFF_FFFF];
        let msg = PackedMessage::from_words(
            SV::new(Constellation::GPS, 1),
            NavType::GpsLNav,
            Epoch::from_gregorian_utc_at_midnight(2020, 1, 1),
            &words,
            30,
        )
        .unwrap();
        assert_eq!(msg.bit_len(), 60);
        assert_eq!(msg.unsigned(0, 8).unwrap(), 0x8B);
        assert_eq!(msg.unsigned(20, 10).unwrap(), 0x3FF);
        assert_eq!(msg.unsigned(30, 30).unwrap(), 0x3FFF_FFFF);
    }
}
