use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("unknown epoch flag \"{0}\"")]
    UnknownValue(String),
}

/// `EpochFlag` validates an epoch,
/// or describes possible events that occurred
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EpochFlag {
    /// Epoch is sane
    #[default]
    Ok = 0,
    /// Power failure since previous epoch
    PowerFailure = 1,
    /// Antenna is being moved at current epoch
    AntennaBeingMoved = 2,
    /// Site has changed, receiver has moved since last epoch
    NewSiteOccupation = 3,
    /// New information to come after this epoch
    HeaderInformationFollows = 4,
    /// External event, significant event in this epoch
    ExternalEvent = 5,
    /// Cycle slip at this epoch
    CycleSlip = 6,
}

impl EpochFlag {
    /// Returns True if self is a valid epoch
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl FromStr for EpochFlag {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u8>()
            .map_err(|_| Error::UnknownValue(s.to_string()))?;
        num_traits::FromPrimitive::from_u8(value).ok_or(Error::UnknownValue(s.to_string()))
    }
}

impl std::fmt::Display for EpochFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", *self as u8)
    }
}
