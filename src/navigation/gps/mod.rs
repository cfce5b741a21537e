//! GPS legacy navigation message (LNAV)
mod almanac;
mod ephemeris;
mod iono_utc;

pub use almanac::GpsLNavAlmanac;
pub use ephemeris::{GpsLNavEphemeris, GpsLNavEphemerisBuilder};
pub(crate) use ephemeris::IOD_MISMATCH;
pub use iono_utc::{GpsLNavIonoUtc, TimeSystemCorrection, UtcPayload};

use crate::{
    bits::{Field, NavType, PackedMessage},
    constants::Framing,
    error::DecodeError,
};

/// Page SV ID of the subframe 4 page 18 (ionosphere and UTC parameters)
pub const IONO_UTC_PAGE_ID: u8 = 56;

const PREAMBLE: Field = Field::unsigned(&[(0, 8)]);
const TOW: Field = Field::unsigned(&[(30, 17)]).factor(6.0);
const SUBFRAME_ID: Field = Field::unsigned(&[(49, 3)]);
const PAGE_ID: Field = Field::unsigned(&[(62, 6)]);

/// TLM and HOW words, common to all subframes
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LNavHeader {
    /// Time of week of the next subframe [s]
    pub tow: u32,
    /// Subframe ID, 1..=5
    pub subframe: u8,
}

impl LNavHeader {
    /// Checks frame type, subframe length and preamble
    pub fn decode(msg: &PackedMessage) -> Result<Self, DecodeError> {
        if msg.nav_type() != NavType::GpsLNav {
            return Err(DecodeError::WrongMessageType);
        }
        if msg.bit_len() < Framing::SUBFRAME_BITS {
            return Err(DecodeError::InvalidParameter("LNAV subframe is too short"));
        }
        if msg.raw(&PREAMBLE)? != Framing::LNAV_PREAMBLE {
            return Err(DecodeError::WrongMessageType);
        }
        let subframe = msg.raw(&SUBFRAME_ID)? as u8;
        if !(1..=5).contains(&subframe) {
            return Err(DecodeError::WrongMessageType);
        }
        Ok(Self {
            tow: msg.value(&TOW)? as u32,
            subframe,
        })
    }
}

/// Page SV ID of a subframe 4 or 5
pub fn page_id(msg: &PackedMessage) -> Result<u8, DecodeError> {
    Ok(msg.raw(&PAGE_ID)? as u8)
}
