use log::{debug, trace};

use crate::{
    bits::{Field, PackedMessage},
    constants::Constants,
    epoch::{hours, nearest_week_second, resolve_week, to_week_second},
    error::DecodeError,
    health::SVHealth,
    navigation::{gps::LNavHeader, SystemPayload},
    prelude::{Duration, Epoch, TimeScale},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// subframe 1
const WN: Field = Field::unsigned(&[(60, 10)]);
const L2_CODES: Field = Field::unsigned(&[(70, 2)]);
const URA: Field = Field::unsigned(&[(72, 4)]);
const HEALTH: Field = Field::unsigned(&[(76, 6)]);
/// Subframes 1, 2 and 3 come from different data sets
pub(crate) const IOD_MISMATCH: &str = "issue of data mismatch";

const IODC: Field = Field::unsigned(&[(82, 2), (210, 8)]);
const L2P: Field = Field::unsigned(&[(90, 1)]);
const TGD: Field = Field::signed(&[(196, 8)]).pow2(-31);
const TOC: Field = Field::unsigned(&[(218, 16)]).pow2(4);
const AF2: Field = Field::signed(&[(240, 8)]).pow2(-55);
const AF1: Field = Field::signed(&[(248, 16)]).pow2(-43);
const AF0: Field = Field::signed(&[(270, 22)]).pow2(-31);

// subframe 2
const IODE2: Field = Field::unsigned(&[(60, 8)]);
const CRS: Field = Field::signed(&[(68, 16)]).pow2(-5);
const DELTA_N: Field = Field::signed(&[(90, 16)]).pow2(-43).semicircles();
const M0: Field = Field::signed(&[(106, 8), (120, 24)]).pow2(-31).semicircles();
const CUC: Field = Field::signed(&[(150, 16)]).pow2(-29);
const E: Field = Field::unsigned(&[(166, 8), (180, 24)]).pow2(-33);
const CUS: Field = Field::signed(&[(210, 16)]).pow2(-29);
const SQRT_A: Field = Field::unsigned(&[(226, 8), (240, 24)]).pow2(-19);
const TOE: Field = Field::unsigned(&[(270, 16)]).pow2(4);
const FIT_FLAG: Field = Field::unsigned(&[(286, 1)]);
const AODO: Field = Field::unsigned(&[(287, 5)]).factor(900.0);

// subframe 3
const CIC: Field = Field::signed(&[(60, 16)]).pow2(-29);
const OMEGA0: Field = Field::signed(&[(76, 8), (90, 24)]).pow2(-31).semicircles();
const CIS: Field = Field::signed(&[(120, 16)]).pow2(-29);
const I0: Field = Field::signed(&[(136, 8), (150, 24)]).pow2(-31).semicircles();
const CRC: Field = Field::signed(&[(180, 16)]).pow2(-5);
const OMEGA: Field = Field::signed(&[(196, 8), (210, 24)]).pow2(-31).semicircles();
const OMEGA_DOT: Field = Field::signed(&[(240, 24)]).pow2(-43).semicircles();
const IODE3: Field = Field::unsigned(&[(270, 8)]);
const IDOT: Field = Field::signed(&[(278, 14)]).pow2(-43).semicircles();

/// GPS LNAV ephemeris, from subframes 1, 2 and 3
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsLNavEphemeris {
    /// Transmission of the earliest subframe
    pub system: SystemPayload,
    /// Transmission time of subframes 1, 2 and 3
    pub xmit: [Epoch; 3],
    /// Week number, rollover resolved
    pub week: u32,
    /// Codes on L2 channel
    pub l2_codes: u8,
    /// User range accuracy index
    pub ura: u8,
    /// Raw 6 bit health
    pub health_bits: u8,
    pub iodc: u16,
    /// P code data flag on L2
    pub l2p: bool,
    /// Group delay [s]
    pub tgd: f64,
    /// Clock reference time
    pub toc: Epoch,
    /// Clock drift rate [s/s^2]
    pub af2: f64,
    /// Clock drift [s/s]
    pub af1: f64,
    /// Clock bias [s]
    pub af0: f64,
    pub iode: u8,
    /// Orbit radius sine harmonic correction [m]
    pub crs: f64,
    /// Mean motion difference [rad/s]
    pub delta_n: f64,
    /// Mean anomaly [rad]
    pub m0: f64,
    /// Argument of latitude cosine harmonic correction [rad]
    pub cuc: f64,
    /// Eccentricity
    pub e: f64,
    /// Argument of latitude sine harmonic correction [rad]
    pub cus: f64,
    /// Square root of the semi major axis [m^1/2]
    pub sqrt_a: f64,
    /// Ephemeris reference time
    pub toe: Epoch,
    /// Fit interval flag
    pub fit_flag: bool,
    /// Age of data offset [s]
    pub aodo: f64,
    /// Inclination cosine harmonic correction [rad]
    pub cic: f64,
    /// Longitude of ascending node [rad]
    pub omega0: f64,
    /// Inclination sine harmonic correction [rad]
    pub cis: f64,
    /// Inclination [rad]
    pub i0: f64,
    /// Orbit radius cosine harmonic correction [m]
    pub crc: f64,
    /// Argument of perigee [rad]
    pub omega: f64,
    /// Rate of right ascension [rad/s]
    pub omega_dot: f64,
    /// Rate of inclination [rad/s]
    pub idot: f64,
    /// Fit interval [h]
    pub fit_hours: u16,
    pub health: SVHealth,
    pub begin_fit: Epoch,
    pub end_fit: Epoch,
}

impl GpsLNavEphemeris {
    /// Returns onboard clock (bias [s], drift [s/s], drift rate [s/s²]).
    pub fn sv_clock(&self) -> (f64, f64, f64) {
        (self.af0, self.af1, self.af2)
    }
    /// Onboard clock correction [s] at `t`
    pub fn clock_correction(&self, t: Epoch) -> f64 {
        let dt = (t - self.toc).to_seconds();
        self.af0 + self.af1 * dt + self.af2 * dt * dt
    }
    /// Group delay as [Duration]
    pub fn tgd(&self) -> Duration {
        Duration::from_seconds(self.tgd)
    }
    /// Semi major axis [m]
    pub fn semi_major_axis(&self) -> f64 {
        self.sqrt_a * self.sqrt_a
    }
    /// Fit interval spans from the earliest transmission
    /// to toe plus half the fit interval.
    pub fn fix_fit(&mut self) -> Result<(), DecodeError> {
        self.fit_hours = Constants::legacy_fit_interval(self.iodc, self.fit_flag)
            .map_err(|_| DecodeError::InvalidParameter("IODC has no fit interval"))?;
        self.begin_fit = self.xmit.iter().copied().fold(self.xmit[0], |a, b| a.min(b));
        self.end_fit = self.toe + hours(self.fit_hours as f64 / 2.0);
        Ok(())
    }
    pub fn fix_health(&mut self) {
        self.health = SVHealth::from_health_bits(self.health_bits as u64);
    }
    /// True if `t` lies within the fit interval
    pub fn is_valid(&self, t: Epoch) -> bool {
        t >= self.begin_fit && t < self.end_fit
    }
    /// Compares payloads, ignoring transmission metadata
    pub fn is_same_data(&self, rhs: &Self) -> bool {
        let mut lhs = self.clone();
        lhs.system = rhs.system;
        lhs.xmit = rhs.xmit;
        lhs.begin_fit = rhs.begin_fit;
        lhs == *rhs
    }
}

/// Accumulates LNAV subframes 1, 2 and 3 of one vehicle
/// until a complete [GpsLNavEphemeris] can be built.
#[derive(Debug, Default, Clone)]
pub struct GpsLNavEphemerisBuilder {
    subframes: [Option<PackedMessage>; 3],
}

impl GpsLNavEphemerisBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    /// Stores a subframe 1, 2 or 3, replacing any previous one.
    pub fn add(&mut self, msg: PackedMessage) -> Result<(), DecodeError> {
        let header = LNavHeader::decode(&msg)?;
        if !(1..=3).contains(&header.subframe) {
            return Err(DecodeError::WrongMessageType);
        }
        if let Some(stored) = self.subframes.iter().flatten().next() {
            if stored.sv() != msg.sv() {
                return Err(DecodeError::InvalidParameter("subframe from another satellite"));
            }
        }
        let index = header.subframe as usize - 1;
        if self.subframes[index].is_some() {
            trace!("{}: replacing subframe {}", msg.sv(), header.subframe);
        }
        self.subframes[index] = Some(msg);
        Ok(())
    }
    /// True when all three subframes are stored
    pub fn is_complete(&self) -> bool {
        self.subframes.iter().all(|sf| sf.is_some())
    }
    pub fn reset(&mut self) {
        self.subframes = Default::default();
    }
    /// Builds the [GpsLNavEphemeris]. Issues of data of the
    /// three subframes must match.
    pub fn build(&self) -> Result<GpsLNavEphemeris, DecodeError> {
        let sf1 = self.subframes[0]
            .as_ref()
            .ok_or(DecodeError::Incomplete("subframe 1"))?;
        let sf2 = self.subframes[1]
            .as_ref()
            .ok_or(DecodeError::Incomplete("subframe 2"))?;
        let sf3 = self.subframes[2]
            .as_ref()
            .ok_or(DecodeError::Incomplete("subframe 3"))?;

        let iodc = sf1.raw(&IODC)? as u16;
        let iode = sf2.raw(&IODE2)? as u8;
        let iode3 = sf3.raw(&IODE3)? as u8;
        if iode != iode3 || iode as u16 != iodc & 0xff {
            debug!(
                "{}: inconsistent issues of data IODC={} IODE={}/{}",
                sf1.sv(),
                iodc,
                iode,
                iode3
            );
            return Err(DecodeError::InvalidParameter(IOD_MISMATCH));
        }

        let xmit = sf1.xmit();
        let (xmit_week, _) = to_week_second(xmit, TimeScale::GPST);
        let week = resolve_week(sf1.raw(&WN)? as u32, 10, xmit_week);

        let earliest = [sf1, sf2, sf3]
            .iter()
            .min_by_key(|sf| sf.xmit())
            .map(|sf| SystemPayload::from(*sf))
            .unwrap_or_default();

        let mut eph = GpsLNavEphemeris {
            system: earliest,
            xmit: [sf1.xmit(), sf2.xmit(), sf3.xmit()],
            week,
            l2_codes: sf1.raw(&L2_CODES)? as u8,
            ura: sf1.raw(&URA)? as u8,
            health_bits: sf1.raw(&HEALTH)? as u8,
            iodc,
            l2p: sf1.raw(&L2P)? > 0,
            tgd: sf1.value(&TGD)?,
            toc: nearest_week_second(sf1.value(&TOC)?, xmit, TimeScale::GPST),
            af2: sf1.value(&AF2)?,
            af1: sf1.value(&AF1)?,
            af0: sf1.value(&AF0)?,
            iode,
            crs: sf2.value(&CRS)?,
            delta_n: sf2.value(&DELTA_N)?,
            m0: sf2.value(&M0)?,
            cuc: sf2.value(&CUC)?,
            e: sf2.value(&E)?,
            cus: sf2.value(&CUS)?,
            sqrt_a: sf2.value(&SQRT_A)?,
            toe: nearest_week_second(sf2.value(&TOE)?, sf2.xmit(), TimeScale::GPST),
            fit_flag: sf2.raw(&FIT_FLAG)? > 0,
            aodo: sf2.value(&AODO)?,
            cic: sf3.value(&CIC)?,
            omega0: sf3.value(&OMEGA0)?,
            cis: sf3.value(&CIS)?,
            i0: sf3.value(&I0)?,
            crc: sf3.value(&CRC)?,
            omega: sf3.value(&OMEGA)?,
            omega_dot: sf3.value(&OMEGA_DOT)?,
            idot: sf3.value(&IDOT)?,
            ..Default::default()
        };
        eph.fix_fit()?;
        eph.fix_health();
        Ok(eph)
    }
}
