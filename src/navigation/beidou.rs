//! BeiDou D1 navigation message
use crate::{
    bits::{Field, NavType, PackedMessage},
    constants::{Constants, Framing},
    error::DecodeError,
    iono::KbModel,
    navigation::{HasIonoCoefficients, SystemPayload},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const PREAMBLE: Field = Field::unsigned(&[(0, 11)]);
const FRAME_ID: Field = Field::unsigned(&[(15, 3)]);
const SOW: Field = Field::unsigned(&[(18, 8), (30, 12)]);
const WN: Field = Field::unsigned(&[(60, 13)]);

const ALPHA0: Field = Field::signed(&[(126, 8)]).pow2(-30);
const ALPHA1: Field = Field::signed(&[(134, 8)]).pow2(-27);
const ALPHA2: Field = Field::signed(&[(150, 8)]).pow2(-24);
const ALPHA3: Field = Field::signed(&[(158, 8)]).pow2(-24);
const BETA0: Field = Field::signed(&[(166, 6), (180, 2)]).pow2(11);
const BETA1: Field = Field::signed(&[(182, 8)]).pow2(14);
const BETA2: Field = Field::signed(&[(190, 8)]).pow2(16);
const BETA3: Field = Field::signed(&[(198, 4), (210, 4)]).pow2(16);

/// D1 subframe header
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct D1Header {
    /// Subframe ID (FraID), 1..=5
    pub frame: u8,
    /// Seconds of BDT week
    pub sow: u32,
}

impl D1Header {
    pub fn decode(msg: &PackedMessage) -> Result<Self, DecodeError> {
        if msg.nav_type() != NavType::BdsD1 {
            return Err(DecodeError::WrongMessageType);
        }
        if msg.bit_len() < Framing::SUBFRAME_BITS {
            return Err(DecodeError::InvalidParameter("D1 subframe is too short"));
        }
        // GEO vehicles broadcast D2
        if Constants::is_beidou_geo(msg.sv()) {
            return Err(DecodeError::WrongMessageType);
        }
        if msg.raw(&PREAMBLE)? != Framing::BDS_PREAMBLE {
            return Err(DecodeError::WrongMessageType);
        }
        let frame = msg.raw(&FRAME_ID)? as u8;
        if !(1..=5).contains(&frame) {
            return Err(DecodeError::WrongMessageType);
        }
        Ok(Self {
            frame,
            sow: msg.raw(&SOW)? as u32,
        })
    }
}

/// Klobuchar parameters broadcast in BeiDou D1 subframe 1
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BdsD1Iono {
    pub system: SystemPayload,
    /// BDT week
    pub week: u16,
    /// Seconds of BDT week of the subframe
    pub sow: u32,
    /// Broadcast coefficients
    pub model: KbModel,
}

impl BdsD1Iono {
    /// Decodes a D1 subframe 1
    pub fn decode(msg: &PackedMessage) -> Result<Self, DecodeError> {
        let header = D1Header::decode(msg)?;
        if header.frame != 1 {
            return Err(DecodeError::WrongMessageType);
        }
        let alpha = [
            msg.value(&ALPHA0)?,
            msg.value(&ALPHA1)?,
            msg.value(&ALPHA2)?,
            msg.value(&ALPHA3)?,
        ];
        let beta = [
            msg.value(&BETA0)?,
            msg.value(&BETA1)?,
            msg.value(&BETA2)?,
            msg.value(&BETA3)?,
        ];
        Ok(Self {
            system: SystemPayload::from(msg),
            week: msg.raw(&WN)? as u16,
            sow: header.sow,
            model: KbModel::new(alpha, beta),
        })
    }
    /// Compares payloads, ignoring transmission metadata
    pub fn is_same_data(&self, rhs: &Self) -> bool {
        self.model == rhs.model
    }
}

impl HasIonoCoefficients for BdsD1Iono {
    fn klobuchar(&self) -> KbModel {
        self.model
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        epoch::week_second,
        prelude::{Constellation, TimeScale, SV},
    };

    fn subframe1(prn: u8) -> PackedMessage {
        let mut msg = PackedMessage::zeroed(
            SV::new(Constellation::BeiDou, prn),
            NavType::BdsD1,
            week_second(744, 3600.0, TimeScale::BDT),
            Framing::SUBFRAME_BITS,
        );
        msg.insert_unsigned(0, 11, 0x712).unwrap();
        msg.insert_unsigned(15, 3, 1).unwrap();
        msg.insert(&SOW, 3600.0).unwrap();
        msg.insert_unsigned(60, 13, 744).unwrap();
        msg.insert(&ALPHA0, 1.11758709E-08).unwrap();
        msg.insert(&ALPHA1, -2.98023224E-08).unwrap();
        msg.insert(&ALPHA2, -5.96046448E-08).unwrap();
        msg.insert(&ALPHA3, 1.19209290E-07).unwrap();
        msg.insert(&BETA0, 1.16736000E+05).unwrap();
        msg.insert(&BETA1, -1.14688000E+05).unwrap();
        msg.insert(&BETA2, -1.31072000E+05).unwrap();
        msg.insert(&BETA3, 4.58752000E+05).unwrap();
        msg
    }

    #[test]
    fn iono_decoding() {
        let iono = BdsD1Iono::decode(&subframe1(11)).unwrap();
        assert_eq!(iono.week, 744);
        assert_eq!(iono.sow, 3600);
        assert_eq!(iono.system.sv, SV::new(Constellation::BeiDou, 11));

        let kb = iono.klobuchar();
        assert!((kb.alpha.0 - 1.11758709E-08).abs() < 1E-15);
        assert!((kb.alpha.1 + 2.98023224E-08).abs() < 1E-15);
        assert!((kb.alpha.2 + 5.96046448E-08).abs() < 1E-15);
        assert!((kb.alpha.3 - 1.19209290E-07).abs() < 1E-15);
        assert_eq!(kb.beta.0, 116736.0);
        assert_eq!(kb.beta.1, -114688.0);
        assert_eq!(kb.beta.2, -131072.0);
        assert_eq!(kb.beta.3, 458752.0);
    }

    #[test]
    fn geo_vehicles() {
        for prn in [1, 5, 59, 63] {
            assert_eq!(
                BdsD1Iono::decode(&subframe1(prn)),
                Err(DecodeError::WrongMessageType)
            );
        }
    }

    #[test]
    fn rejected_subframes() {
        let mut msg = subframe1(11);
        msg.insert_unsigned(15, 3, 2).unwrap();
        assert_eq!(BdsD1Iono::decode(&msg), Err(DecodeError::WrongMessageType));

        let mut msg = subframe1(11);
        msg.insert_unsigned(0, 11, 0x711).unwrap();
        assert_eq!(BdsD1Iono::decode(&msg), Err(DecodeError::WrongMessageType));

        let msg = subframe1(11);
        let short = PackedMessage::new(msg.sv(), NavType::BdsD1, msg.xmit(), msg.bytes()[..20].to_vec(), 160)
            .unwrap();
        assert!(matches!(
            BdsD1Iono::decode(&short),
            Err(DecodeError::InvalidParameter(_))
        ));
    }
}
