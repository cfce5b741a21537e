use crate::{
    bits::{Field, PackedMessage},
    constants::{ReferenceSemiMajorAxis, PI},
    epoch::{hours, nearest_week_second},
    error::DecodeError,
    health::SVHealth,
    navigation::{gps::LNavHeader, gps::page_id, SystemPayload},
    prelude::{Constellation, Epoch, TimeScale, SV},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const E: Field = Field::unsigned(&[(68, 16)]).pow2(-21);
const TOA: Field = Field::unsigned(&[(90, 8)]).pow2(12);
const DELTA_I: Field = Field::signed(&[(98, 16)]).pow2(-19).semicircles();
const OMEGA_DOT: Field = Field::signed(&[(120, 16)]).pow2(-38).semicircles();
const HEALTH: Field = Field::unsigned(&[(136, 8)]);
const SQRT_A: Field = Field::unsigned(&[(150, 24)]).pow2(-11);
const OMEGA0: Field = Field::signed(&[(180, 24)]).pow2(-23).semicircles();
const OMEGA: Field = Field::signed(&[(210, 24)]).pow2(-23).semicircles();
const M0: Field = Field::signed(&[(240, 24)]).pow2(-23).semicircles();
const AF0: Field = Field::signed(&[(270, 8), (289, 3)]).pow2(-20);
const AF1: Field = Field::signed(&[(278, 11)]).pow2(-38);

/// Almanac reference inclination [semicircles]
const I_REF: f64 = 0.30;

/// GPS LNAV almanac page (subframe 4 or 5, page SV ID 1..=32)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsLNavAlmanac {
    pub system: SystemPayload,
    /// Vehicle this almanac describes
    pub subject: SV,
    /// Reference time of almanac
    pub toa: Epoch,
    /// Eccentricity
    pub e: f64,
    /// Inclination offset from 0.30 semicircles [rad]
    pub delta_i: f64,
    /// Rate of right ascension [rad/s]
    pub omega_dot: f64,
    /// Raw 8 bit health
    pub health_bits: u8,
    /// Square root of the semi major axis [m^1/2]
    pub sqrt_a: f64,
    /// Longitude of ascending node [rad]
    pub omega0: f64,
    /// Argument of perigee [rad]
    pub omega: f64,
    /// Mean anomaly [rad]
    pub m0: f64,
    /// Clock bias [s]
    pub af0: f64,
    /// Clock drift [s/s]
    pub af1: f64,
    pub health: SVHealth,
    pub begin_fit: Epoch,
    pub end_fit: Epoch,
}

impl Default for GpsLNavAlmanac {
    fn default() -> Self {
        Self {
            system: SystemPayload::default(),
            subject: SV::default(),
            toa: Epoch::default(),
            e: 0.0,
            delta_i: 0.0,
            omega_dot: 0.0,
            health_bits: 0xff,
            sqrt_a: 0.0,
            omega0: 0.0,
            omega: 0.0,
            m0: 0.0,
            af0: 0.0,
            af1: 0.0,
            health: SVHealth::Unknown,
            begin_fit: Epoch::default(),
            end_fit: Epoch::default(),
        }
    }
}

impl GpsLNavAlmanac {
    /// Decodes an almanac page
    pub fn decode(msg: &PackedMessage) -> Result<Self, DecodeError> {
        let header = LNavHeader::decode(msg)?;
        if header.subframe != 4 && header.subframe != 5 {
            return Err(DecodeError::WrongMessageType);
        }
        let prn = page_id(msg)?;
        if !(1..=32).contains(&prn) {
            return Err(DecodeError::WrongMessageType);
        }
        let toa = nearest_week_second(msg.value(&TOA)?, msg.xmit(), TimeScale::GPST);
        let mut alm = Self {
            system: SystemPayload::from(msg),
            subject: SV::new(Constellation::GPS, prn),
            toa,
            e: msg.value(&E)?,
            delta_i: msg.value(&DELTA_I)?,
            omega_dot: msg.value(&OMEGA_DOT)?,
            health_bits: msg.raw(&HEALTH)? as u8,
            sqrt_a: msg.value(&SQRT_A)?,
            omega0: msg.value(&OMEGA0)?,
            omega: msg.value(&OMEGA)?,
            m0: msg.value(&M0)?,
            af0: msg.value(&AF0)?,
            af1: msg.value(&AF1)?,
            ..Default::default()
        };
        alm.fix_fit();
        alm.fix_health();
        Ok(alm)
    }
    /// Fit interval spans 70 h before and 74 h after toa
    pub fn fix_fit(&mut self) {
        self.begin_fit = self.toa - hours(70.0);
        self.end_fit = self.toa + hours(74.0);
    }
    pub fn fix_health(&mut self) {
        self.health = SVHealth::from_health_bits(self.health_bits as u64);
    }
    /// Orbit inclination [rad]
    pub fn inclination(&self) -> f64 {
        I_REF * PI + self.delta_i
    }
    /// Semi major axis [m]
    pub fn semi_major_axis(&self) -> f64 {
        self.sqrt_a * self.sqrt_a
    }
    /// Semi major axis offset to the nominal GPS orbit [m]
    pub fn delta_a(&self) -> f64 {
        self.semi_major_axis() - ReferenceSemiMajorAxis::GPS
    }
    /// True if `t` lies within the fit interval
    pub fn is_valid(&self, t: Epoch) -> bool {
        t >= self.begin_fit && t < self.end_fit
    }
    /// Compares payloads, ignoring transmission metadata
    pub fn is_same_data(&self, rhs: &Self) -> bool {
        self.subject == rhs.subject
            && self.toa == rhs.toa
            && self.e == rhs.e
            && self.delta_i == rhs.delta_i
            && self.omega_dot == rhs.omega_dot
            && self.health_bits == rhs.health_bits
            && self.sqrt_a == rhs.sqrt_a
            && self.omega0 == rhs.omega0
            && self.omega == rhs.omega
            && self.m0 == rhs.m0
            && self.af0 == rhs.af0
            && self.af1 == rhs.af1
    }
}
