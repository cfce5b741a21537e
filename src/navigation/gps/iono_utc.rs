use crate::{
    bits::{Field, PackedMessage},
    epoch::{hours, resolve_week, to_week_second, week_second, SECONDS_PER_WEEK},
    error::DecodeError,
    iono::KbModel,
    navigation::{
        gps::{page_id, LNavHeader, IONO_UTC_PAGE_ID},
        HasIonoCoefficients, HasUtcOffset, SystemPayload,
    },
    prelude::{Epoch, TimeScale},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const ALPHA0: Field = Field::signed(&[(68, 8)]).pow2(-30);
const ALPHA1: Field = Field::signed(&[(76, 8)]).pow2(-27);
const ALPHA2: Field = Field::signed(&[(90, 8)]).pow2(-24);
const ALPHA3: Field = Field::signed(&[(98, 8)]).pow2(-24);
const BETA0: Field = Field::signed(&[(106, 8)]).pow2(11);
const BETA1: Field = Field::signed(&[(120, 8)]).pow2(14);
const BETA2: Field = Field::signed(&[(128, 8)]).pow2(16);
const BETA3: Field = Field::signed(&[(136, 8)]).pow2(16);
const A1: Field = Field::signed(&[(150, 24)]).pow2(-50);
const A0: Field = Field::signed(&[(180, 24), (210, 8)]).pow2(-30);
const TOT: Field = Field::unsigned(&[(218, 8)]).pow2(12);
const WNT: Field = Field::unsigned(&[(226, 8)]);
const DT_LS: Field = Field::signed(&[(240, 8)]);
const WN_LSF: Field = Field::unsigned(&[(248, 8)]);
const DN: Field = Field::unsigned(&[(256, 8)]);
const DT_LSF: Field = Field::signed(&[(270, 8)]);

/// Minimal age of an initial UTC transmission before it may be used
const SIX_HOURS: f64 = 6.0;

/// GPS to UTC parameters
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UtcPayload {
    /// Bias [s]
    pub a0: f64,
    /// Drift [s/s]
    pub a1: f64,
    /// Reference time
    pub tot: Epoch,
    /// Reference week, rollover resolved
    pub wnt: u32,
    /// Current leap seconds
    pub dt_ls: i16,
    /// Leap second effectivity week, as broadcast (8 bits)
    pub wn_lsf: u8,
    /// Leap second effectivity day of week, 1..=7
    pub dn: u8,
    /// Leap seconds after effectivity
    pub dt_lsf: i16,
    /// Leap second effectivity week, rollover resolved
    pub wn_lsf_full: u32,
    /// Leap second effectivity: end of day DN of week WN_LSF (GPST)
    pub lsf: Epoch,
}

impl UtcPayload {
    /// Polynomial offset [s] at `t`, leap seconds excluded
    pub fn polynomial(&self, t: Epoch) -> f64 {
        self.a0 + self.a1 * (t - self.tot).to_seconds()
    }
}

/// GPS to UTC correction, as exchanged with other time systems tools
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeSystemCorrection {
    pub from: TimeScale,
    pub to: TimeScale,
    /// Bias [s]
    pub a0: f64,
    /// Drift [s/s]
    pub a1: f64,
    /// Reference epoch of the polynomial
    pub reference: Epoch,
}

impl std::fmt::Display for TimeSystemCorrection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (week, sow) = to_week_second(self.reference, self.from);
        write!(
            f,
            "{}->{} A0={:.10E} A1={:.9E} ref={} {}",
            self.from, self.to, self.a0, self.a1, week, sow as u32
        )
    }
}

/// GPS LNAV ionospheric and UTC parameters (subframe 4, page 18)
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsLNavIonoUtc {
    pub system: SystemPayload,
    pub klobuchar: KbModel,
    pub utc: UtcPayload,
}

impl GpsLNavIonoUtc {
    pub fn decode(msg: &PackedMessage) -> Result<Self, DecodeError> {
        let header = LNavHeader::decode(msg)?;
        if header.subframe != 4 || page_id(msg)? != IONO_UTC_PAGE_ID {
            return Err(DecodeError::WrongMessageType);
        }

        let klobuchar = KbModel::new(
            [
                msg.value(&ALPHA0)?,
                msg.value(&ALPHA1)?,
                msg.value(&ALPHA2)?,
                msg.value(&ALPHA3)?,
            ],
            [
                msg.value(&BETA0)?,
                msg.value(&BETA1)?,
                msg.value(&BETA2)?,
                msg.value(&BETA3)?,
            ],
        );

        let (xmit_week, _) = to_week_second(msg.xmit(), TimeScale::GPST);
        let wnt = resolve_week(msg.raw(&WNT)? as u32, 8, xmit_week);
        let wn_lsf = msg.raw(&WN_LSF)? as u8;
        let wn_lsf_full = resolve_week(wn_lsf as u32, 8, xmit_week);
        let dn = msg.raw(&DN)? as u8;

        let utc = UtcPayload {
            a0: msg.value(&A0)?,
            a1: msg.value(&A1)?,
            tot: week_second(wnt, msg.value(&TOT)?, TimeScale::GPST),
            wnt,
            dt_ls: msg.value(&DT_LS)? as i16,
            wn_lsf,
            dn,
            dt_lsf: msg.value(&DT_LSF)? as i16,
            wn_lsf_full,
            lsf: week_second(wn_lsf_full, dn as f64 * 86_400.0, TimeScale::GPST),
        };

        Ok(Self {
            system: SystemPayload::from(msg),
            klobuchar,
            utc,
        })
    }
    /// GPS to UTC correction
    pub fn time_system_correction(&self) -> TimeSystemCorrection {
        TimeSystemCorrection {
            from: TimeScale::GPST,
            to: TimeScale::UTC,
            a0: self.utc.a0,
            a1: self.utc.a1,
            reference: self.utc.tot,
        }
    }
    /// Compares payloads, ignoring transmission metadata
    pub fn is_same_data(&self, rhs: &Self) -> bool {
        self.klobuchar == rhs.klobuchar && self.utc == rhs.utc
    }
}

impl HasUtcOffset for GpsLNavIonoUtc {
    fn is_utc_valid(&self, t: Epoch, initial_xmit: bool) -> bool {
        if (t - self.utc.tot).to_seconds().abs() > SECONDS_PER_WEEK / 2.0 {
            return false;
        }
        if initial_xmit && t < self.system.xmit + hours(SIX_HOURS) {
            return false;
        }
        true
    }
    /// IS-GPS-200 20.3.3.5.2.4: before the effectivity time (cases a and b)
    /// current leap seconds apply, past that time (case c) the future
    /// leap seconds apply.
    fn utc_offset(&self, t: Epoch) -> f64 {
        let leap = if t < self.utc.lsf {
            self.utc.dt_ls
        } else {
            self.utc.dt_lsf
        };
        leap as f64 + self.utc.polynomial(t)
    }
    fn utc_offset_mod_leap_sec(&self, t: Epoch) -> f64 {
        self.utc.polynomial(t)
    }
}

impl HasIonoCoefficients for GpsLNavIonoUtc {
    fn klobuchar(&self) -> KbModel {
        self.klobuchar
    }
}

impl std::fmt::Display for GpsLNavIonoUtc {
    /// Terse, single line description
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (xmit_week, xmit_sow) = to_week_second(self.system.xmit, TimeScale::GPST);
        let (tot_week, tot_sow) = to_week_second(self.utc.tot, TimeScale::GPST);
        write!(
            f,
            "{} UTC/I xmit {:04} {:06} tot {:04} {:06} A0 {:.10E} A1 {:.9E} dtLS {} WNLSF {} DN {} dtLSF {}",
            self.system.sv,
            xmit_week,
            xmit_sow as u32,
            tot_week,
            tot_sow as u32,
            self.utc.a0,
            self.utc.a1,
            self.utc.dt_ls,
            self.utc.wn_lsf_full,
            self.utc.dn,
            self.utc.dt_lsf,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::navigation::gps::test::subframe;

    fn page18(xmit: Epoch) -> PackedMessage {
        let mut msg = subframe(5, 4, xmit);
        msg.insert_unsigned(62, 6, 56).unwrap();
        msg.insert(&ALPHA0, 1.11758709E-08).unwrap();
        msg.insert(&ALPHA1, -2.98023224E-08).unwrap();
        msg.insert(&ALPHA2, -5.96046448E-08).unwrap();
        msg.insert(&ALPHA3, 1.19209290E-07).unwrap();
        msg.insert(&BETA0, 1.14688E+05).unwrap();
        msg.insert(&BETA1, -1.47456E+05).unwrap();
        msg.insert(&BETA2, -1.31072E+05).unwrap();
        msg.insert(&BETA3, 8.52992E+05).unwrap();
        msg.insert(&A0, 1.862645149231E-09).unwrap();
        msg.insert(&A1, 8.881784197001E-16).unwrap();
        msg.insert(&TOT, 405_504.0).unwrap();
        msg.insert_unsigned(226, 8, 2100 % 256).unwrap();
        msg.insert(&DT_LS, 18.0).unwrap();
        msg.insert_unsigned(248, 8, 2101 % 256).unwrap();
        msg.insert_unsigned(256, 8, 7).unwrap();
        msg.insert(&DT_LSF, 19.0).unwrap();
        msg
    }

    #[test]
    fn page18_decoding() {
        let xmit = week_second(2100, 400_000.0, TimeScale::GPST);
        let rec = GpsLNavIonoUtc::decode(&page18(xmit)).unwrap();
        let kb = rec.klobuchar();
        assert_eq!(kb.alpha.0, 12.0 * 2.0_f64.powi(-30));
        assert_eq!(kb.alpha.1, -1.0 * 2.0_f64.powi(-25));
        assert_eq!(kb.beta.0, 56.0 * 2048.0);
        assert_eq!(kb.beta.3, 13.0 * 65536.0);
        assert_eq!(rec.utc.wnt, 2100);
        assert_eq!(rec.utc.tot, week_second(2100, 405_504.0, TimeScale::GPST));
        assert_eq!(rec.utc.dt_ls, 18);
        assert_eq!(rec.utc.dt_lsf, 19);
        assert_eq!(rec.utc.wn_lsf_full, 2101);
        assert_eq!(rec.utc.lsf, week_second(2102, 0.0, TimeScale::GPST));
        assert_eq!(rec.utc.a0, 2.0_f64.powi(-29));
        assert_eq!(rec.utc.a1, 2.0_f64.powi(-50));
    }

    #[test]
    fn utc_validity_and_offset() {
        let xmit = week_second(2100, 400_000.0, TimeScale::GPST);
        let rec = GpsLNavIonoUtc::decode(&page18(xmit)).unwrap();

        let t = week_second(2100, 410_000.0, TimeScale::GPST);
        assert!(rec.is_utc_valid(t, false));
        assert!(!rec.is_utc_valid(t, true));
        let t = xmit + hours(6.0);
        assert!(rec.is_utc_valid(t, true));
        let t = week_second(2101, 405_504.0, TimeScale::GPST);
        assert!(!rec.is_utc_valid(t, false));

        let t = week_second(2100, 405_504.0, TimeScale::GPST);
        assert_eq!(rec.utc_offset_mod_leap_sec(t), 2.0_f64.powi(-29));
        assert_eq!(rec.utc_offset(t), 18.0 + 2.0_f64.powi(-29));

        let after = week_second(2102, 10.0, TimeScale::GPST);
        let expected = 19.0 + rec.utc.polynomial(after);
        assert_eq!(rec.utc_offset(after), expected);
    }

    #[test]
    fn time_system_correction() {
        let xmit = week_second(2100, 400_000.0, TimeScale::GPST);
        let rec = GpsLNavIonoUtc::decode(&page18(xmit)).unwrap();
        let tsc = rec.time_system_correction();
        assert_eq!(tsc.from, TimeScale::GPST);
        assert_eq!(tsc.to, TimeScale::UTC);
        assert_eq!(tsc.reference, rec.utc.tot);
        assert!(rec.to_string().contains("UTC/I"));
        assert!(rec.to_string().contains("dtLSF 19"));
    }

    #[test]
    fn same_data() {
        let rec1 = GpsLNavIonoUtc::decode(&page18(week_second(2100, 400_000.0, TimeScale::GPST)))
            .unwrap();
        let rec2 = GpsLNavIonoUtc::decode(&page18(week_second(2100, 412_000.0, TimeScale::GPST)))
            .unwrap();
        assert_ne!(rec1, rec2);
        assert!(rec1.is_same_data(&rec2));
    }

    #[test]
    fn almanac_page_is_rejected() {
        let xmit = week_second(2100, 400_000.0, TimeScale::GPST);
        let mut msg = page18(xmit);
        msg.insert_unsigned(62, 6, 25).unwrap();
        assert_eq!(GpsLNavIonoUtc::decode(&msg), Err(DecodeError::WrongMessageType));
    }
}
