#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

#[macro_use]
extern crate num_derive;

pub mod angle;
pub mod ashtech;
pub mod bits;
pub mod carrier;
pub mod constants;
pub mod enu;
pub mod epoch;
pub mod health;
pub mod iono;
pub mod navigation;
pub mod observation;
pub mod position;
pub mod sp3;
pub mod tropo;

mod error;

pub use error::{DecodeError, Error};

pub mod prelude {
    pub use crate::{
        angle::AngleReduced,
        bits::{Field, NavType, PackedMessage},
        carrier::Carrier,
        enu::{EnuRotation, SvState},
        error::{DecodeError, Error},
        health::{GalHealthStatus, SVHealth},
        iono::{KbModel, KbRegionCode},
        navigation::{
            BdsD1Iono, GalINavAlmanac, GalINavAlmanacBuilder, GpsLNavAlmanac, GpsLNavEphemeris,
            GpsLNavEphemerisBuilder, GpsLNavIonoUtc, HasIonoCoefficients, HasUtcOffset,
            NavDecoder, NavDecoderOptions, NavMessageType, NavRecord,
        },
        observation::{
            EpochFlag, FullOrdering, HeaderMerge, Merge, ObsType, ObservationData,
            ObservationHeader, ObservationRecord, RecordOrdering, TimeOrdering,
        },
        position::{Geodetic, Position},
        sp3::{Sp3FormatOptions, Sp3SatId},
        tropo::{MissingInputs, NeillBuilder, NeillModel},
    };
    // pub re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
}
