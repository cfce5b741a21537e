//! Signal and vehicle health indications
use num_traits::FromPrimitive;
use strum_macros::EnumIter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Galileo signal health status, as broadcast
/// in the 2 bit E5b / E1-B HS fields.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, FromPrimitive, EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GalHealthStatus {
    /// Signal OK
    OK = 0,
    /// Signal out of service
    OutOfService = 1,
    /// Signal will be out of service
    WillBeOOS = 2,
    /// Signal component currently in test
    InTest = 3,
    /// Not decoded yet
    #[default]
    Unknown = 4,
}

impl GalHealthStatus {
    /// Interprets a 2 bit HS field
    pub fn from_bits(hs: u64) -> Self {
        Self::from_u64(hs & 0x03).unwrap_or_default()
    }
}

impl std::fmt::Display for GalHealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::OK => write!(f, "OK"),
            Self::OutOfService => write!(f, "Out of service"),
            Self::WillBeOOS => write!(f, "Will be out of service"),
            Self::InTest => write!(f, "In test"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Aggregate vehicle health, as derived from broadcast health bits
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SVHealth {
    #[default]
    Unknown,
    Healthy,
    Unhealthy,
    /// Partially usable
    Degraded,
}

impl SVHealth {
    /// Healthy if all health bits are cleared
    pub fn from_health_bits(bits: u64) -> Self {
        if bits == 0 {
            Self::Healthy
        } else {
            Self::Unhealthy
        }
    }
    /// Combines two Galileo signal health indications into a vehicle health:
    ///
    /// | E5b \ E1-B  | OK        | OOS       | WillBeOOS | InTest    |
    /// |-------------|-----------|-----------|-----------|-----------|
    /// | OK          | Healthy   | Degraded  | Degraded  | Degraded  |
    /// | OOS         | Degraded  | Unhealthy | Degraded  | Degraded  |
    /// | WillBeOOS   | Degraded  | Degraded  | Degraded  | Degraded  |
    /// | InTest      | Degraded  | Degraded  | Degraded  | Degraded  |
    ///
    /// Unknown on either side is Degraded.
    pub fn combine(a: GalHealthStatus, b: GalHealthStatus) -> Self {
        match (a, b) {
            (GalHealthStatus::OK, GalHealthStatus::OK) => Self::Healthy,
            (GalHealthStatus::OutOfService, GalHealthStatus::OutOfService) => Self::Unhealthy,
            _ => Self::Degraded,
        }
    }
    /// True if this vehicle can be used at all
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Healthy | Self::Degraded)
    }
}

impl std::fmt::Display for SVHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Healthy => write!(f, "Healthy"),
            Self::Unhealthy => write!(f, "Unhealthy"),
            Self::Degraded => write!(f, "Degraded"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use strum::IntoEnumIterator;
    #[test]
    fn hs_decoding() {
        assert_eq!(GalHealthStatus::from_bits(0), GalHealthStatus::OK);
        assert_eq!(GalHealthStatus::from_bits(1), GalHealthStatus::OutOfService);
        assert_eq!(GalHealthStatus::from_bits(2), GalHealthStatus::WillBeOOS);
        assert_eq!(GalHealthStatus::from_bits(3), GalHealthStatus::InTest);
        assert_eq!(GalHealthStatus::from_bits(7), GalHealthStatus::InTest);
    }
    #[test]
    fn combination_is_symmetric() {
        for a in GalHealthStatus::iter() {
            for b in GalHealthStatus::iter() {
                assert_eq!(SVHealth::combine(a, b), SVHealth::combine(b, a));
                let expected = match (a, b) {
                    (GalHealthStatus::OK, GalHealthStatus::OK) => SVHealth::Healthy,
                    (GalHealthStatus::OutOfService, GalHealthStatus::OutOfService) => {
                        SVHealth::Unhealthy
                    },
                    _ => SVHealth::Degraded,
                };
                assert_eq!(SVHealth::combine(a, b), expected, "{} {}", a, b);
            }
        }
        assert_eq!(
            SVHealth::combine(GalHealthStatus::OK, GalHealthStatus::OutOfService),
            SVHealth::Degraded
        );
        assert_eq!(
            SVHealth::combine(GalHealthStatus::Unknown, GalHealthStatus::OK),
            SVHealth::Degraded
        );
    }
    #[test]
    fn health_bits() {
        assert_eq!(SVHealth::from_health_bits(0), SVHealth::Healthy);
        assert_eq!(SVHealth::from_health_bits(0x3f), SVHealth::Unhealthy);
        assert!(!SVHealth::Unknown.is_usable());
    }
}
