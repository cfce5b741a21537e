//! Multi message navigation decoder
use std::collections::HashMap;

use bitflags::bitflags;
use log::{debug, trace};

use crate::{
    bits::{NavType, PackedMessage},
    error::DecodeError,
    navigation::{
        beidou::D1Header,
        galileo::{word_type, IODA_MISMATCH},
        gps::{page_id, LNavHeader, IONO_UTC_PAGE_ID, IOD_MISMATCH},
        BdsD1Iono, GalINavAlmanacBuilder, GpsLNavAlmanac, GpsLNavEphemerisBuilder,
        GpsLNavIonoUtc, NavMessageType, NavRecord,
    },
    prelude::SV,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// Selects the records a [NavDecoder] produces
    #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct NavDecoderOptions: u8 {
        const EPHEMERIS = 0x01;
        const ALMANAC = 0x02;
        const IONO = 0x04;
        const TIME_OFFSET = 0x08;
        /// Drop records whose payload repeats the previous
        /// record of the same kind, for the same vehicle.
        const UNIQUE = 0x10;
    }
}

impl Default for NavDecoderOptions {
    fn default() -> Self {
        Self::all()
    }
}

impl NavDecoderOptions {
    /// True if records of this [NavMessageType] should be produced
    pub fn accepts(&self, msg_type: NavMessageType) -> bool {
        match msg_type {
            NavMessageType::Ephemeris => self.contains(Self::EPHEMERIS),
            NavMessageType::Almanac => self.contains(Self::ALMANAC),
            NavMessageType::Iono => self.contains(Self::IONO),
            NavMessageType::TimeOffset => self.contains(Self::TIME_OFFSET),
        }
    }
}

/// Navigation message decoder. Accumulates the messages of
/// multi message records per vehicle and returns records as
/// soon as they are complete.
/// ```
/// use gnss_nav::prelude::*;
///
/// let mut decoder = NavDecoder::new(
///     NavDecoderOptions::ALMANAC | NavDecoderOptions::UNIQUE
/// );
///
/// let msg = PackedMessage::zeroed(
///     SV::new(Constellation::GPS, 1),
///     NavType::GpsLNav,
///     Epoch::default(),
///     300,
/// );
///
/// // not a valid subframe: no preamble
/// assert!(decoder.decode(msg).is_err());
/// ```
#[derive(Debug, Default, Clone)]
pub struct NavDecoder {
    options: NavDecoderOptions,
    ephemeris: HashMap<SV, GpsLNavEphemerisBuilder>,
    almanac: HashMap<SV, GalINavAlmanacBuilder>,
    latest: HashMap<(SV, NavMessageType), NavRecord>,
}

impl NavDecoder {
    pub fn new(options: NavDecoderOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }
    pub fn options(&self) -> NavDecoderOptions {
        self.options
    }
    /// Drops all pending messages and previous records
    pub fn reset(&mut self) {
        self.ephemeris.clear();
        self.almanac.clear();
        self.latest.clear();
    }
    /// Decodes one [PackedMessage]. Returns a [NavRecord] when this
    /// message completes one that passes the filter, None otherwise.
    pub fn decode(&mut self, msg: PackedMessage) -> Result<Option<NavRecord>, DecodeError> {
        let record = match msg.nav_type() {
            NavType::GpsLNav => self.decode_lnav(msg)?,
            NavType::GalINav => self.decode_inav(msg)?,
            NavType::BdsD1 => self.decode_d1(&msg)?,
        };
        Ok(record.and_then(|record| self.filter(record)))
    }
    fn filter(&mut self, record: NavRecord) -> Option<NavRecord> {
        let msg_type = record.message_type();
        let accepted = match &record {
            NavRecord::GpsLNavIonoUtc(_) => {
                self.options.accepts(NavMessageType::Iono)
                    || self.options.accepts(NavMessageType::TimeOffset)
            },
            _ => self.options.accepts(msg_type),
        };
        if !accepted {
            return None;
        }
        if self.options.contains(NavDecoderOptions::UNIQUE) {
            let key = (record.subject(), msg_type);
            if let Some(latest) = self.latest.get(&key) {
                if latest.is_same_data(&record) {
                    trace!("{}: repeated {}", key.0, msg_type);
                    return None;
                }
            }
            self.latest.insert(key, record.clone());
        }
        Some(record)
    }
    fn decode_lnav(&mut self, msg: PackedMessage) -> Result<Option<NavRecord>, DecodeError> {
        let header = LNavHeader::decode(&msg)?;
        match header.subframe {
            1..=3 => {
                if !self.options.contains(NavDecoderOptions::EPHEMERIS) {
                    return Ok(None);
                }
                let sv = msg.sv();
                let builder = self.ephemeris.entry(sv).or_default();
                builder.add(msg)?;
                if !builder.is_complete() {
                    return Ok(None);
                }
                match builder.build() {
                    Ok(eph) => {
                        builder.reset();
                        Ok(Some(NavRecord::GpsLNavEphemeris(eph)))
                    },
                    Err(DecodeError::InvalidParameter(e)) if e == IOD_MISMATCH => {
                        // cutover: wait for a consistent set
                        debug!("{}: ephemeris not built yet: {}", sv, e);
                        Ok(None)
                    },
                    Err(e) => {
                        builder.reset();
                        Err(e)
                    },
                }
            },
            _ => match page_id(&msg)? {
                1..=32 => Ok(Some(NavRecord::GpsLNavAlmanac(GpsLNavAlmanac::decode(
                    &msg,
                )?))),
                IONO_UTC_PAGE_ID if header.subframe == 4 => Ok(Some(NavRecord::GpsLNavIonoUtc(
                    GpsLNavIonoUtc::decode(&msg)?,
                ))),
                page => {
                    trace!("{}: ignoring subframe {} page {}", msg.sv(), header.subframe, page);
                    Ok(None)
                },
            },
        }
    }
    fn decode_inav(&mut self, msg: PackedMessage) -> Result<Option<NavRecord>, DecodeError> {
        match word_type(&msg)? {
            7 | 8 => {
                if !self.options.contains(NavDecoderOptions::ALMANAC) {
                    return Ok(None);
                }
                let sv = msg.sv();
                let builder = self.almanac.entry(sv).or_default();
                builder.add(msg)?;
                if !builder.is_complete() {
                    return Ok(None);
                }
                match builder.build() {
                    Ok(alm) => {
                        builder.reset();
                        Ok(Some(NavRecord::GalINavAlmanac(alm)))
                    },
                    Err(DecodeError::InvalidParameter(e)) if e == IODA_MISMATCH => {
                        debug!("{}: almanac not built yet: {}", sv, e);
                        Ok(None)
                    },
                    Err(e) => {
                        builder.reset();
                        Err(e)
                    },
                }
            },
            word => {
                trace!("{}: ignoring word type {}", msg.sv(), word);
                Ok(None)
            },
        }
    }
    fn decode_d1(&mut self, msg: &PackedMessage) -> Result<Option<NavRecord>, DecodeError> {
        let header = D1Header::decode(msg)?;
        if header.frame == 1 {
            Ok(Some(NavRecord::BdsD1Iono(BdsD1Iono::decode(msg)?)))
        } else {
            trace!("{}: ignoring subframe {}", msg.sv(), header.frame);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        epoch::week_second,
        navigation::gps::test::subframe,
        prelude::{Constellation, Epoch, TimeScale},
    };

    fn frame(prn: u8, sow: f64) -> [PackedMessage; 3] {
        let xmit = week_second(2100, sow, TimeScale::GPST);
        [1, 2, 3].map(|sf| subframe(prn, sf, xmit))
    }

    fn almanac_page(prn: u8, subject: u8, xmit: Epoch) -> PackedMessage {
        let mut msg = subframe(prn, 5, xmit);
        msg.insert_unsigned(62, 6, subject as u64).unwrap();
        msg
    }

    #[test]
    fn ephemeris_accumulation() {
        let mut decoder = NavDecoder::default();
        let [sf1, sf2, sf3] = frame(5, 396_000.0);
        assert_eq!(decoder.decode(sf1), Ok(None));
        assert_eq!(decoder.decode(sf2), Ok(None));
        let record = decoder.decode(sf3).unwrap().unwrap();
        assert_eq!(record.message_type(), NavMessageType::Ephemeris);
        assert_eq!(record.subject(), SV::new(Constellation::GPS, 5));
        assert!(record.as_gps_ephemeris().is_some());

        // repeated broadcast
        for sf in frame(5, 396_030.0) {
            assert_eq!(decoder.decode(sf), Ok(None));
        }
    }

    #[test]
    fn repeated_records() {
        let mut decoder = NavDecoder::new(NavDecoderOptions::EPHEMERIS);
        let mut records = 0;
        for sow in [396_000.0, 396_030.0] {
            for sf in frame(5, sow) {
                if decoder.decode(sf).unwrap().is_some() {
                    records += 1;
                }
            }
        }
        assert_eq!(records, 2);
    }

    #[test]
    fn message_filter() {
        let mut decoder = NavDecoder::new(NavDecoderOptions::ALMANAC);
        for sf in frame(5, 396_000.0) {
            assert_eq!(decoder.decode(sf), Ok(None));
        }
        let xmit = week_second(2100, 396_000.0, TimeScale::GPST);
        let record = decoder.decode(almanac_page(5, 12, xmit)).unwrap().unwrap();
        assert_eq!(record.subject(), SV::new(Constellation::GPS, 12));
        assert_eq!(record.system().sv, SV::new(Constellation::GPS, 5));

        let mut page = subframe(5, 4, xmit);
        page.insert_unsigned(62, 6, 56).unwrap();
        assert_eq!(decoder.decode(page.clone()), Ok(None));

        let mut decoder = NavDecoder::new(NavDecoderOptions::TIME_OFFSET);
        let record = decoder.decode(page).unwrap().unwrap();
        assert!(record.as_gps_iono_utc().is_some());
    }

    #[test]
    fn ignored_pages() {
        let mut decoder = NavDecoder::default();
        let xmit = week_second(2100, 396_000.0, TimeScale::GPST);
        assert_eq!(decoder.decode(almanac_page(5, 51, xmit)), Ok(None));
        assert_eq!(decoder.decode(almanac_page(5, 0, xmit)), Ok(None));
    }

    #[test]
    fn content_errors() {
        // IODC 758 has no fit interval when the fit flag is set
        let mut decoder = NavDecoder::default();
        let [mut sf1, mut sf2, mut sf3] = frame(5, 396_000.0);
        sf1.insert_unsigned(82, 2, 758 >> 8).unwrap();
        sf1.insert_unsigned(210, 8, 758 & 0xff).unwrap();
        sf2.insert_unsigned(60, 8, 758 & 0xff).unwrap();
        sf2.insert_unsigned(286, 1, 1).unwrap();
        sf3.insert_unsigned(270, 8, 758 & 0xff).unwrap();
        assert_eq!(decoder.decode(sf1), Ok(None));
        assert_eq!(decoder.decode(sf2), Ok(None));
        assert_eq!(
            decoder.decode(sf3),
            Err(DecodeError::InvalidParameter("IODC has no fit interval"))
        );

        // dummy Galileo almanac
        let xmit = week_second(2100, 141.0, TimeScale::GST);
        let word = |word_type: u64| {
            let mut msg = PackedMessage::zeroed(
                SV::new(Constellation::Galileo, 3),
                NavType::GalINav,
                xmit,
                128,
            );
            msg.insert_unsigned(0, 6, word_type).unwrap();
            msg
        };
        assert_eq!(decoder.decode(word(7)), Ok(None));
        assert_eq!(
            decoder.decode(word(8)),
            Err(DecodeError::InvalidParameter("dummy almanac"))
        );
        // pending words were dropped
        assert_eq!(decoder.decode(word(8)), Ok(None));
    }

    #[test]
    fn invalid_messages() {
        let mut decoder = NavDecoder::default();
        let msg = PackedMessage::zeroed(
            SV::new(Constellation::Galileo, 1),
            NavType::GalINav,
            Epoch::default(),
            64,
        );
        assert!(matches!(
            decoder.decode(msg),
            Err(DecodeError::InvalidParameter(_))
        ));
        let msg = PackedMessage::zeroed(
            SV::new(Constellation::BeiDou, 11),
            NavType::BdsD1,
            Epoch::default(),
            300,
        );
        assert_eq!(decoder.decode(msg), Err(DecodeError::WrongMessageType));
    }
}
