//! Navigation message decoding
pub mod beidou;
pub mod decoder;
pub mod galileo;
pub mod gps;

use crate::{
    bits::{NavType, PackedMessage},
    health::SVHealth,
    iono::KbModel,
    prelude::{Constellation, Epoch, SV},
};

use strum_macros::EnumIter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use beidou::BdsD1Iono;
pub use decoder::{NavDecoder, NavDecoderOptions};
pub use galileo::{GalINavAlmanac, GalINavAlmanacBuilder};
pub use gps::{
    GpsLNavAlmanac, GpsLNavEphemeris, GpsLNavEphemerisBuilder, GpsLNavIonoUtc,
    TimeSystemCorrection, UtcPayload,
};

/// Kind of content a navigation record carries
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NavMessageType {
    /// Precise orbit and clock
    Ephemeris,
    /// Coarse orbit and clock
    Almanac,
    /// Ionospheric model
    Iono,
    /// Time system offsets
    TimeOffset,
}

impl std::fmt::Display for NavMessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Ephemeris => write!(f, "Ephemeris"),
            Self::Almanac => write!(f, "Almanac"),
            Self::Iono => write!(f, "Iono"),
            Self::TimeOffset => write!(f, "TimeOffset"),
        }
    }
}

/// Transmission metadata, shared by all records
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SystemPayload {
    /// Transmitting vehicle
    pub sv: SV,
    /// Frame type
    pub nav: Option<NavType>,
    /// Transmission time of the (first) message
    pub xmit: Epoch,
}

impl From<&PackedMessage> for SystemPayload {
    fn from(msg: &PackedMessage) -> Self {
        Self {
            sv: msg.sv(),
            nav: Some(msg.nav_type()),
            xmit: msg.xmit(),
        }
    }
}

/// Records that can express the GNSS to UTC offset
pub trait HasUtcOffset {
    /// True if the UTC parameters may be used at epoch `t`
    fn is_utc_valid(&self, t: Epoch, initial_xmit: bool) -> bool;
    /// GNSS - UTC offset [s] at `t`, leap seconds included
    fn utc_offset(&self, t: Epoch) -> f64;
    /// GNSS - UTC offset [s] at `t`, leap seconds excluded
    fn utc_offset_mod_leap_sec(&self, t: Epoch) -> f64;
}

/// Records that carry broadcast ionospheric coefficients
pub trait HasIonoCoefficients {
    fn klobuchar(&self) -> KbModel;
}

/// Decoded navigation record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NavRecord {
    GpsLNavEphemeris(GpsLNavEphemeris),
    GpsLNavAlmanac(GpsLNavAlmanac),
    GpsLNavIonoUtc(GpsLNavIonoUtc),
    GalINavAlmanac(GalINavAlmanac),
    BdsD1Iono(BdsD1Iono),
}

impl NavRecord {
    /// Transmission metadata
    pub fn system(&self) -> &SystemPayload {
        match self {
            Self::GpsLNavEphemeris(r) => &r.system,
            Self::GpsLNavAlmanac(r) => &r.system,
            Self::GpsLNavIonoUtc(r) => &r.system,
            Self::GalINavAlmanac(r) => &r.system,
            Self::BdsD1Iono(r) => &r.system,
        }
    }
    pub fn constellation(&self) -> Constellation {
        match self {
            Self::GpsLNavEphemeris(_) | Self::GpsLNavAlmanac(_) | Self::GpsLNavIonoUtc(_) => {
                Constellation::GPS
            },
            Self::GalINavAlmanac(_) => Constellation::Galileo,
            Self::BdsD1Iono(_) => Constellation::BeiDou,
        }
    }
    pub fn message_type(&self) -> NavMessageType {
        match self {
            Self::GpsLNavEphemeris(_) => NavMessageType::Ephemeris,
            Self::GpsLNavAlmanac(_) | Self::GalINavAlmanac(_) => NavMessageType::Almanac,
            Self::GpsLNavIonoUtc(_) | Self::BdsD1Iono(_) => NavMessageType::Iono,
        }
    }
    /// Vehicle the record describes. For almanacs, this is
    /// not necessarily the transmitting vehicle.
    pub fn subject(&self) -> SV {
        match self {
            Self::GpsLNavAlmanac(r) => r.subject,
            Self::GalINavAlmanac(r) => r.subject,
            _ => self.system().sv,
        }
    }
    /// Fit interval [begin, end[ of orbit bearing records
    pub fn fit_interval(&self) -> Option<(Epoch, Epoch)> {
        match self {
            Self::GpsLNavEphemeris(r) => Some((r.begin_fit, r.end_fit)),
            Self::GpsLNavAlmanac(r) => Some((r.begin_fit, r.end_fit)),
            Self::GalINavAlmanac(r) => Some((r.begin_fit, r.end_fit)),
            _ => None,
        }
    }
    /// Vehicle health of orbit bearing records
    pub fn health(&self) -> Option<SVHealth> {
        match self {
            Self::GpsLNavEphemeris(r) => Some(r.health),
            Self::GpsLNavAlmanac(r) => Some(r.health),
            Self::GalINavAlmanac(r) => Some(r.health),
            _ => None,
        }
    }
    /// Compares payloads, ignoring transmission metadata
    pub fn is_same_data(&self, rhs: &Self) -> bool {
        match (self, rhs) {
            (Self::GpsLNavEphemeris(a), Self::GpsLNavEphemeris(b)) => a.is_same_data(b),
            (Self::GpsLNavAlmanac(a), Self::GpsLNavAlmanac(b)) => a.is_same_data(b),
            (Self::GpsLNavIonoUtc(a), Self::GpsLNavIonoUtc(b)) => a.is_same_data(b),
            (Self::GalINavAlmanac(a), Self::GalINavAlmanac(b)) => a.is_same_data(b),
            (Self::BdsD1Iono(a), Self::BdsD1Iono(b)) => a.is_same_data(b),
            _ => false,
        }
    }
    /// Unwraps self as [GpsLNavEphemeris], if possible
    pub fn as_gps_ephemeris(&self) -> Option<&GpsLNavEphemeris> {
        match self {
            Self::GpsLNavEphemeris(r) => Some(r),
            _ => None,
        }
    }
    /// Unwraps self as [GpsLNavAlmanac], if possible
    pub fn as_gps_almanac(&self) -> Option<&GpsLNavAlmanac> {
        match self {
            Self::GpsLNavAlmanac(r) => Some(r),
            _ => None,
        }
    }
    /// Unwraps self as [GpsLNavIonoUtc], if possible
    pub fn as_gps_iono_utc(&self) -> Option<&GpsLNavIonoUtc> {
        match self {
            Self::GpsLNavIonoUtc(r) => Some(r),
            _ => None,
        }
    }
    /// Unwraps self as [GalINavAlmanac], if possible
    pub fn as_galileo_almanac(&self) -> Option<&GalINavAlmanac> {
        match self {
            Self::GalINavAlmanac(r) => Some(r),
            _ => None,
        }
    }
    /// Unwraps self as [BdsD1Iono], if possible
    pub fn as_beidou_iono(&self) -> Option<&BdsD1Iono> {
        match self {
            Self::BdsD1Iono(r) => Some(r),
            _ => None,
        }
    }
    /// Ionospheric model, if this record carries one
    pub fn klobuchar(&self) -> Option<KbModel> {
        match self {
            Self::GpsLNavIonoUtc(r) => Some(r.klobuchar()),
            Self::BdsD1Iono(r) => Some(r.klobuchar()),
            _ => None,
        }
    }
}
