use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid snr code")]
    InvalidSNRCode,
}

/// Signal strength indication (SSI), as attached to
/// RINEX observations.
#[derive(Default, PartialOrd, Ord, PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SNR {
    /// SNR ~= 0 dB/Hz
    DbHz0 = 0,
    /// SNR < 12 dB/Hz
    DbHz12 = 1,
    /// 12 dB/Hz <= SNR < 17 dB/Hz
    DbHz12_17 = 2,
    /// 18 dB/Hz <= SNR < 23 dB/Hz
    DbHz18_23 = 3,
    /// 24 dB/Hz <= SNR < 29 dB/Hz
    #[default]
    DbHz24_29 = 4,
    /// 30 dB/Hz <= SNR < 35 dB/Hz
    DbHz30_35 = 5,
    /// 36 dB/Hz <= SNR < 41 dB/Hz
    DbHz36_41 = 6,
    /// 42 dB/Hz <= SNR < 47 dB/Hz
    DbHz42_47 = 7,
    /// 48 dB/Hz <= SNR < 53 dB/Hz
    DbHz48_53 = 8,
    /// SNR >= 54 dB/Hz
    DbHz54 = 9,
}

impl SNR {
    /// RINEX code, 0 meaning unknown
    pub fn code(&self) -> u8 {
        *self as u8
    }
    pub fn is_bad(self) -> bool {
        self <= Self::DbHz18_23
    }
    pub fn is_strong(self) -> bool {
        self >= Self::DbHz30_35
    }
}

impl FromStr for SNR {
    type Err = Error;
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code.trim() {
            "0" => Ok(Self::DbHz0),
            "1" => Ok(Self::DbHz12),
            "2" => Ok(Self::DbHz12_17),
            "3" => Ok(Self::DbHz18_23),
            "4" => Ok(Self::DbHz24_29),
            "5" => Ok(Self::DbHz30_35),
            "6" => Ok(Self::DbHz36_41),
            "7" => Ok(Self::DbHz42_47),
            "8" => Ok(Self::DbHz48_53),
            "9" => Ok(Self::DbHz54),
            _ => Err(Error::InvalidSNRCode),
        }
    }
}

impl std::fmt::Display for SNR {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<f64> for SNR {
    fn from(f_db: f64) -> Self {
        if f_db < 12.0 {
            Self::DbHz12
        } else if f_db <= 17.0 {
            Self::DbHz12_17
        } else if f_db <= 23.0 {
            Self::DbHz18_23
        } else if f_db <= 29.0 {
            Self::DbHz24_29
        } else if f_db <= 35.0 {
            Self::DbHz30_35
        } else if f_db <= 41.0 {
            Self::DbHz36_41
        } else if f_db <= 47.0 {
            Self::DbHz42_47
        } else if f_db <= 53.0 {
            Self::DbHz48_53
        } else {
            Self::DbHz54
        }
    }
}
