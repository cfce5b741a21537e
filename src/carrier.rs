//! Carrier signals and associated frequencies

use crate::constants::{Multiplier, RSVCLK_HZ, SPEED_OF_LIGHT_M_S};
use strum_macros::EnumIter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Carrier {
    /// L1 (GPS, QZSS)
    #[default]
    L1,
    /// L2 (GPS, QZSS)
    L2,
    /// L5 (GPS, QZSS)
    L5,
    /// E1: Galileo, same frequency as L1
    E1,
    /// E5b: Galileo
    E5b,
    /// E6: Galileo
    E6,
    /// B1I: BeiDou
    B1I,
    /// B3I: BeiDou
    B3I,
}

impl std::fmt::Display for Carrier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
            Self::L5 => write!(f, "L5"),
            Self::E1 => write!(f, "E1"),
            Self::E5b => write!(f, "E5b"),
            Self::E6 => write!(f, "E6"),
            Self::B1I => write!(f, "B1I"),
            Self::B3I => write!(f, "B3I"),
        }
    }
}

impl Carrier {
    /// Returns carrier frequency in Hz
    pub fn frequency(&self) -> f64 {
        match self {
            Self::L1 | Self::E1 => Multiplier::L1 * RSVCLK_HZ,
            Self::L2 => Multiplier::L2 * RSVCLK_HZ,
            Self::L5 => Multiplier::L5 * RSVCLK_HZ,
            Self::E5b => Multiplier::E5B * RSVCLK_HZ,
            Self::E6 => Multiplier::E6 * RSVCLK_HZ,
            Self::B1I => 1561.098E6,
            Self::B3I => 1268.52E6,
        }
    }
    /// Returns carrier frequency in MHz
    pub fn frequency_mhz(&self) -> f64 {
        self.frequency() / 1.0E6
    }
    /// Returns carrier wavelength in meters
    pub fn wavelength(&self) -> f64 {
        SPEED_OF_LIGHT_M_S / self.frequency()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn frequencies() {
        assert_eq!(Carrier::L1.frequency_mhz(), 1575.42);
        assert_eq!(Carrier::L2.frequency_mhz(), 1227.6);
        assert_eq!(Carrier::L5.frequency_mhz(), 1176.45);
        assert!((Carrier::E5b.frequency_mhz() - 1207.14).abs() < 1E-9);
        assert!((Carrier::E6.frequency_mhz() - 1278.75).abs() < 1E-9);
        assert!((Carrier::L1.wavelength() - 0.190293672798).abs() < 1E-9);
    }
}
