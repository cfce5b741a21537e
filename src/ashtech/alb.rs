use crate::{
    ashtech::{Error, RecordHeader},
    bits::{NavType, PackedMessage},
    prelude::{Constellation, Epoch, SV},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of spare bytes closing an ALB record
const SPARE_SIZE: usize = 82;

/// Binary almanac record (ALB): ten raw almanac subframe words
/// of one vehicle, as collected by the receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Alb {
    /// Vehicle the almanac describes
    pub svid: u16,
    /// Byte following the svid
    pub separator: u8,
    /// Subframe words, 30 bits each, right justified
    pub words: [u32; 10],
    /// Checksum, as received (not verified)
    pub checksum: u16,
    /// Trailing bytes, preserved verbatim
    pub spare: Vec<u8>,
}

impl Default for Alb {
    fn default() -> Self {
        Self {
            svid: 0,
            separator: b',',
            words: [0; 10],
            checksum: 0,
            spare: vec![0; SPARE_SIZE],
        }
    }
}

impl Alb {
    /// Record identifier
    pub const ID: &'static str = "ALB";

    /// Total encoded size, header included
    pub const fn encoding_size() -> usize {
        RecordHeader::SIZE + 2 + 1 + 40 + 2 + SPARE_SIZE
    }

    /// Decodes an ALB from `buf`, which must start with the record header.
    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        let header = RecordHeader::decode(buf)?;
        if header.id != Self::ID {
            return Err(Error::UnexpectedRecord(header.id));
        }
        if buf.len() < Self::encoding_size() {
            return Err(Error::NotEnoughBytes);
        }

        let mut ptr = RecordHeader::SIZE;
        let svid = u16::from_be_bytes([buf[ptr], buf[ptr + 1]]);
        ptr += 2;

        let separator = buf[ptr];
        ptr += 1;

        let mut words = [0_u32; 10];
        for word in words.iter_mut() {
            *word = u32::from_be_bytes([buf[ptr], buf[ptr + 1], buf[ptr + 2], buf[ptr + 3]]);
            ptr += 4;
        }

        let checksum = u16::from_be_bytes([buf[ptr], buf[ptr + 1]]);
        ptr += 2;

        Ok(Self {
            svid,
            separator,
            words,
            checksum,
            spare: buf[ptr..ptr + SPARE_SIZE].to_vec(),
        })
    }

    /// Encodes Self into `buf`, returning the number of bytes written.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, Error> {
        let size = Self::encoding_size();
        if buf.len() < size {
            return Err(Error::NotEnoughBytes);
        }
        if self.spare.len() != SPARE_SIZE {
            return Err(Error::InvalidFormat);
        }

        let mut ptr = RecordHeader::new(Self::ID).encode(buf)?;

        buf[ptr..ptr + 2].copy_from_slice(&self.svid.to_be_bytes());
        ptr += 2;

        buf[ptr] = self.separator;
        ptr += 1;

        for word in self.words.iter() {
            buf[ptr..ptr + 4].copy_from_slice(&word.to_be_bytes());
            ptr += 4;
        }

        buf[ptr..ptr + 2].copy_from_slice(&self.checksum.to_be_bytes());
        ptr += 2;

        buf[ptr..ptr + SPARE_SIZE].copy_from_slice(&self.spare);
        Ok(ptr + SPARE_SIZE)
    }

    /// Encodes Self into a new buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut buf = vec![0; Self::encoding_size()];
        self.encode(&mut buf)?;
        Ok(buf)
    }

    /// Vehicle this almanac describes
    pub fn sv(&self) -> Result<SV, Error> {
        let prn = u8::try_from(self.svid).map_err(|_| Error::InvalidSvid(self.svid))?;
        Ok(SV::new(Constellation::GPS, prn))
    }

    /// Repacks the ten words as a GPS LNAV subframe, so it can
    /// be decoded by [crate::navigation::GpsLNavAlmanac].
    pub fn to_subframe(&self, xmit: Epoch) -> Result<PackedMessage, Error> {
        let words = self.words.map(|w| w & 0x3fff_ffff);
        let msg = PackedMessage::from_words(self.sv()?, NavType::GpsLNav, xmit, &words, 30)?;
        Ok(msg)
    }
}
