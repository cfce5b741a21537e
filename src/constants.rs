//! Physical and ICD constants

use crate::prelude::{Constellation, SV};

/// PI as defined by the GPS and Galileo ICDs (semicircles to radians)
pub const PI: f64 = 3.1415926535898;

/// Speed of light in vacuum [m/s]
pub const SPEED_OF_LIGHT_M_S: f64 = 2.99792458E8;

/// GPS and Galileo base frequency [Hz]
pub const RSVCLK_HZ: f64 = 10.23E6;

/// Multipliers of [RSVCLK_HZ] for each carrier
pub(crate) struct Multiplier;

impl Multiplier {
    pub const L1: f64 = 154.0;
    pub const L2: f64 = 120.0;
    pub const L5: f64 = 115.0;
    pub const E5B: f64 = 118.0;
    pub const E6: f64 = 125.0;
}

/// Reference semi major axis [m], almanac dA is expressed relative to it
pub(crate) struct ReferenceSemiMajorAxis;

impl ReferenceSemiMajorAxis {
    pub const GPS: f64 = 26559710.0;
    pub const GAL: f64 = 29600000.0;
}

/// Earth gravitational constant [m^3/s^2]
pub(crate) struct GM;

impl GM {
    pub const GPS: f64 = 3.986005E14;
    pub const BDS: f64 = 3.986004418E14;
    pub const GAL: f64 = 3.986004418E14;
}

/// Earth rotation rate [rad/s]
pub(crate) struct Omega;

impl Omega {
    pub const GPS: f64 = 7.2921151467E-5;
    pub const BDS: f64 = 7.292115E-5;
    pub const GAL: f64 = 7.2921151467E-5;
}

/// Navigation message framing
pub(crate) struct Framing;

impl Framing {
    /// GPS LNAV TLM preamble
    pub const LNAV_PREAMBLE: u64 = 0x8B;
    /// BeiDou D1/D2 preamble (11 bits)
    pub const BDS_PREAMBLE: u64 = 0x712;
    /// LNAV and D1 subframe length [bits]
    pub const SUBFRAME_BITS: usize = 300;
    /// I/NAV word length [bits]
    pub const INAV_WORD_BITS: usize = 128;
}

/// Constellation dependent constants
pub struct Constants;

impl Constants {
    /// Earth gravitational constant for this [SV]
    pub const fn gm(sv: SV) -> f64 {
        match sv.constellation {
            Constellation::BeiDou => GM::BDS,
            Constellation::Galileo => GM::GAL,
            _ => GM::GPS,
        }
    }

    /// Earth rotation rate for this [SV]
    pub const fn omega(sv: SV) -> f64 {
        match sv.constellation {
            Constellation::BeiDou => Omega::BDS,
            Constellation::Galileo => Omega::GAL,
            _ => Omega::GPS,
        }
    }

    /// True if this [SV] is a BeiDou geostationary vehicle.
    /// Those broadcast D2 navigation frames.
    pub fn is_beidou_geo(sv: SV) -> bool {
        sv.constellation == Constellation::BeiDou && (sv.prn <= 5 || (59..=63).contains(&sv.prn))
    }

    /// Legacy GPS fit interval in hours, from the IODC and the
    /// subframe 2 fit interval flag (IS-GPS-200 table 20-XII).
    pub fn legacy_fit_interval(iodc: u16, fit_flag: bool) -> Result<u16, crate::Error> {
        if iodc > 1023 {
            return Ok(4);
        }
        let low = iodc & 0xff;
        if !fit_flag {
            return Ok(4);
        }
        match iodc {
            _ if low < 240 => Ok(6),
            240..=247 => Ok(8),
            248..=255 | 496 => Ok(14),
            497..=503 | 1021..=1023 => Ok(26),
            504..=510 => Ok(50),
            511 | 752..=756 => Ok(74),
            757 => Ok(98),
            _ => Err(crate::Error::InvalidRequest("no fit interval for this IODC")),
        }
    }
}
