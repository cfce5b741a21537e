//! Galileo I/NAV almanac
use log::trace;

use crate::{
    bits::{Field, NavType, PackedMessage},
    constants::{Framing, ReferenceSemiMajorAxis, PI},
    epoch::{hours, resolve_week, to_week_second, week_second},
    error::DecodeError,
    health::{GalHealthStatus, SVHealth},
    navigation::SystemPayload,
    prelude::{Constellation, Duration, Epoch, TimeScale, SV},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const WORD_TYPE: Field = Field::unsigned(&[(0, 6)]);

// word type 7
const IODA7: Field = Field::unsigned(&[(6, 4)]);
const WNA: Field = Field::unsigned(&[(10, 2)]);
const TOA: Field = Field::unsigned(&[(12, 10)]).factor(600.0);
const SVID1: Field = Field::unsigned(&[(22, 6)]);
const DELTA_SQRT_A: Field = Field::signed(&[(28, 13)]).pow2(-9);
const E: Field = Field::unsigned(&[(41, 11)]).pow2(-16);
const OMEGA: Field = Field::signed(&[(52, 16)]).pow2(-15).semicircles();
const DELTA_I: Field = Field::signed(&[(68, 11)]).pow2(-14).semicircles();
const OMEGA0: Field = Field::signed(&[(79, 16)]).pow2(-15).semicircles();
const OMEGA_DOT: Field = Field::signed(&[(95, 11)]).pow2(-33).semicircles();
const M0: Field = Field::signed(&[(106, 16)]).pow2(-15).semicircles();

// word type 8
const IODA8: Field = Field::unsigned(&[(6, 4)]);
const AF0: Field = Field::signed(&[(10, 16)]).pow2(-19);
const AF1: Field = Field::signed(&[(26, 13)]).pow2(-38);
const HS_E5B: Field = Field::unsigned(&[(39, 2)]);
const HS_E1B: Field = Field::unsigned(&[(41, 2)]);

/// Word types 7 and 8 come from different almanac sets
pub(crate) const IODA_MISMATCH: &str = "IODa mismatch";

/// Nominal inclination [°]
const I_REF_DEG: f64 = 56.0;

/// Galileo I/NAV almanac of the first vehicle (SVID1),
/// gathered from word types 7 and 8.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GalINavAlmanac {
    /// Transmission of word type 7
    pub system: SystemPayload,
    /// Transmission time of word type 8
    pub xmit2: Epoch,
    /// Vehicle this almanac describes
    pub subject: SV,
    /// Almanac issue of data
    pub iod_a: u8,
    /// Almanac reference week, as broadcast (2 bits)
    pub wna: u8,
    /// Almanac reference time
    pub toa: Epoch,
    /// Square root of the semi major axis, offset
    /// to the nominal orbit [m^1/2]
    pub delta_sqrt_a: f64,
    /// Eccentricity
    pub e: f64,
    /// Argument of perigee [rad]
    pub omega: f64,
    /// Inclination offset from 56° [rad]
    pub delta_i: f64,
    /// Longitude of ascending node [rad]
    pub omega0: f64,
    /// Rate of right ascension [rad/s]
    pub omega_dot: f64,
    /// Mean anomaly [rad]
    pub m0: f64,
    /// Clock bias [s]
    pub af0: f64,
    /// Clock drift [s/s]
    pub af1: f64,
    /// E5b signal health
    pub hs_e5b: GalHealthStatus,
    /// E1-B signal health
    pub hs_e1b: GalHealthStatus,
    pub health: SVHealth,
    pub begin_fit: Epoch,
    pub end_fit: Epoch,
}

impl Default for GalINavAlmanac {
    fn default() -> Self {
        Self {
            system: SystemPayload::default(),
            xmit2: Epoch::default(),
            subject: SV::default(),
            iod_a: 0,
            wna: 0,
            toa: Epoch::default(),
            delta_sqrt_a: 0.0,
            e: 0.0,
            omega: 0.0,
            delta_i: 0.0,
            omega0: 0.0,
            omega_dot: 0.0,
            m0: 0.0,
            af0: 0.0,
            af1: 0.0,
            hs_e5b: GalHealthStatus::Unknown,
            hs_e1b: GalHealthStatus::Unknown,
            health: SVHealth::Unknown,
            begin_fit: Epoch::default(),
            end_fit: Epoch::default(),
        }
    }
}

impl GalINavAlmanac {
    /// Time at which a user holds the complete almanac:
    /// end of the latest of the two words.
    pub fn user_time(&self) -> Epoch {
        self.system.xmit.max(self.xmit2) + Duration::from_seconds(2.0)
    }
    /// Fit interval spans from the transmission to 74 h past toa
    pub fn fix_fit(&mut self) {
        self.begin_fit = self.system.xmit;
        self.end_fit = self.toa + hours(74.0);
    }
    pub fn fix_health(&mut self) {
        self.health = SVHealth::combine(self.hs_e5b, self.hs_e1b);
    }
    /// Semi major axis [m]
    pub fn semi_major_axis(&self) -> f64 {
        let sqrt_a = ReferenceSemiMajorAxis::GAL.sqrt() + self.delta_sqrt_a;
        sqrt_a * sqrt_a
    }
    /// Orbit inclination [rad]
    pub fn inclination(&self) -> f64 {
        I_REF_DEG / 180.0 * PI + self.delta_i
    }
    /// True if `t` lies within the fit interval
    pub fn is_valid(&self, t: Epoch) -> bool {
        t >= self.begin_fit && t < self.end_fit
    }
    /// Compares payloads, ignoring transmission metadata
    pub fn is_same_data(&self, rhs: &Self) -> bool {
        let mut lhs = self.clone();
        lhs.system = rhs.system;
        lhs.xmit2 = rhs.xmit2;
        lhs.begin_fit = rhs.begin_fit;
        lhs == *rhs
    }
}

/// Accumulates I/NAV word types 7 and 8 of one vehicle
#[derive(Debug, Default, Clone)]
pub struct GalINavAlmanacBuilder {
    word7: Option<PackedMessage>,
    word8: Option<PackedMessage>,
}

/// Word type of an I/NAV word
pub fn word_type(msg: &PackedMessage) -> Result<u8, DecodeError> {
    if msg.nav_type() != NavType::GalINav {
        return Err(DecodeError::WrongMessageType);
    }
    if msg.bit_len() < Framing::INAV_WORD_BITS {
        return Err(DecodeError::InvalidParameter("I/NAV word is too short"));
    }
    Ok(msg.raw(&WORD_TYPE)? as u8)
}

impl GalINavAlmanacBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    /// Stores a word type 7 or 8, replacing any previous one.
    pub fn add(&mut self, msg: PackedMessage) -> Result<(), DecodeError> {
        let word = word_type(&msg)?;
        if let Some(stored) = self.word7.as_ref().or(self.word8.as_ref()) {
            if stored.sv() != msg.sv() {
                return Err(DecodeError::InvalidParameter("word from another satellite"));
            }
        }
        match word {
            7 => self.word7 = Some(msg),
            8 => self.word8 = Some(msg),
            _ => return Err(DecodeError::WrongMessageType),
        }
        Ok(())
    }
    pub fn is_complete(&self) -> bool {
        self.word7.is_some() && self.word8.is_some()
    }
    pub fn reset(&mut self) {
        self.word7 = None;
        self.word8 = None;
    }
    /// Builds the [GalINavAlmanac]. Both words must share the same IODa.
    pub fn build(&self) -> Result<GalINavAlmanac, DecodeError> {
        let w7 = self
            .word7
            .as_ref()
            .ok_or(DecodeError::Incomplete("word type 7"))?;
        let w8 = self
            .word8
            .as_ref()
            .ok_or(DecodeError::Incomplete("word type 8"))?;

        let iod_a = w7.raw(&IODA7)? as u8;
        if iod_a != w8.raw(&IODA8)? as u8 {
            trace!("{}: almanac IODa mismatch", w7.sv());
            return Err(DecodeError::InvalidParameter(IODA_MISMATCH));
        }

        let svid = w7.raw(&SVID1)? as u8;
        if svid == 0 {
            return Err(DecodeError::InvalidParameter("dummy almanac"));
        }

        let wna = w7.raw(&WNA)? as u8;
        let (xmit_week, _) = to_week_second(w7.xmit(), TimeScale::GST);
        let toa = week_second(
            resolve_week(wna as u32, 2, xmit_week),
            w7.value(&TOA)?,
            TimeScale::GST,
        );

        let mut alm = GalINavAlmanac {
            system: SystemPayload::from(w7),
            xmit2: w8.xmit(),
            subject: SV::new(Constellation::Galileo, svid),
            iod_a,
            wna,
            toa,
            delta_sqrt_a: w7.value(&DELTA_SQRT_A)?,
            e: w7.value(&E)?,
            omega: w7.value(&OMEGA)?,
            delta_i: w7.value(&DELTA_I)?,
            omega0: w7.value(&OMEGA0)?,
            omega_dot: w7.value(&OMEGA_DOT)?,
            m0: w7.value(&M0)?,
            af0: w8.value(&AF0)?,
            af1: w8.value(&AF1)?,
            hs_e5b: GalHealthStatus::from_bits(w8.raw(&HS_E5B)?),
            hs_e1b: GalHealthStatus::from_bits(w8.raw(&HS_E1B)?),
            ..Default::default()
        };
        alm.fix_fit();
        alm.fix_health();
        Ok(alm)
    }
}
