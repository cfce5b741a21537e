//! SP3 satellite identifiers
use std::{cmp::Ordering, str::FromStr};

use thiserror::Error;

use crate::prelude::{Constellation, SV};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("empty satellite identifier")]
    Empty,
    #[error("unknown system '{0}'")]
    UnknownSystem(char),
    #[error("system '{0}' is not supported")]
    UnsupportedSystem(char),
    #[error("invalid prn \"{0}\"")]
    InvalidPrn(String),
}

/// Formatting options of [Sp3SatId]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sp3FormatOptions {
    /// Padding of single digit PRNs
    pub fill: char,
}

impl Default for Sp3FormatOptions {
    fn default() -> Self {
        Self { fill: '0' }
    }
}

impl Sp3FormatOptions {
    pub fn with_fill(&self, fill: char) -> Self {
        let mut s = *self;
        s.fill = fill;
        s
    }
}

/// Satellite, as identified in SP3 files: a system letter
/// followed by a two digit PRN.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sp3SatId {
    sv: SV,
}

/// Systems SP3 can describe, in comparison order
const SYSTEMS: [(char, Constellation); 6] = [
    ('G', Constellation::GPS),
    ('E', Constellation::Galileo),
    ('R', Constellation::Glonass),
    ('C', Constellation::BeiDou),
    ('J', Constellation::QZSS),
    ('M', Constellation::Mixed),
];

fn rank(constellation: Constellation) -> usize {
    SYSTEMS
        .iter()
        .position(|(_, c)| *c == constellation)
        .unwrap_or(SYSTEMS.len())
}

impl Sp3SatId {
    /// Builds a new [Sp3SatId]. Fails if the constellation
    /// has no SP3 representation or if the PRN is null.
    pub fn new(sv: SV) -> Result<Self, ParsingError> {
        if !SYSTEMS.iter().any(|(_, c)| *c == sv.constellation) {
            return Err(ParsingError::UnsupportedSystem(
                sv.constellation.to_string().chars().next().unwrap_or('?'),
            ));
        }
        if sv.prn == 0 {
            return Err(ParsingError::InvalidPrn(sv.prn.to_string()));
        }
        Ok(Self { sv })
    }
    pub fn sv(&self) -> SV {
        self.sv
    }
    /// SP3 system letter
    pub fn system_char(&self) -> char {
        SYSTEMS
            .iter()
            .find(|(_, c)| *c == self.sv.constellation)
            .map(|(c, _)| *c)
            .unwrap_or('?')
    }
    /// Formats self with given [Sp3FormatOptions]
    pub fn format(&self, opts: Sp3FormatOptions) -> String {
        let prn = self.sv.prn.to_string();
        if prn.len() < 2 {
            format!("{}{}{}", self.system_char(), opts.fill, prn)
        } else {
            format!("{}{}", self.system_char(), prn)
        }
    }
}

impl TryFrom<SV> for Sp3SatId {
    type Error = ParsingError;
    fn try_from(sv: SV) -> Result<Self, Self::Error> {
        Self::new(sv)
    }
}

impl From<Sp3SatId> for SV {
    fn from(id: Sp3SatId) -> SV {
        id.sv
    }
}

impl PartialOrd for Sp3SatId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Sp3SatId {
    fn cmp(&self, other: &Self) -> Ordering {
        rank(self.sv.constellation)
            .cmp(&rank(other.sv.constellation))
            .then(self.sv.prn.cmp(&other.sv.prn))
    }
}

impl std::fmt::Display for Sp3SatId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.format(Sp3FormatOptions::default()))
    }
}

impl FromStr for Sp3SatId {
    type Err = ParsingError;
    /// Parses "G01", "g 1", or a bare number (GPS)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let first = s.chars().next().ok_or(ParsingError::Empty)?;
        let (constellation, prn) = if first.is_ascii_digit() {
            (Constellation::GPS, s)
        } else {
            let letter = first.to_ascii_uppercase();
            if letter == 'L' {
                return Err(ParsingError::UnsupportedSystem(letter));
            }
            let (_, c) = SYSTEMS
                .iter()
                .find(|(c, _)| *c == letter)
                .ok_or(ParsingError::UnknownSystem(first))?;
            (*c, s[first.len_utf8()..].trim())
        };
        let prn = prn
            .parse::<u8>()
            .map_err(|_| ParsingError::InvalidPrn(prn.to_string()))?;
        Self::new(SV::new(constellation, prn))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parsing() {
        for (desc, constellation, prn) in [
            ("G01", Constellation::GPS, 1),
            ("g 5", Constellation::GPS, 5),
            ("  7", Constellation::GPS, 7),
            ("R24", Constellation::Glonass, 24),
            ("e12", Constellation::Galileo, 12),
            ("C59", Constellation::BeiDou, 59),
            ("J03", Constellation::QZSS, 3),
        ] {
            let id = Sp3SatId::from_str(desc).unwrap();
            assert_eq!(id.sv(), SV::new(constellation, prn), "failed to parse \"{}\"", desc);
        }
    }

    #[test]
    fn invalid_identifiers() {
        assert_eq!(Sp3SatId::from_str(""), Err(ParsingError::Empty));
        assert_eq!(Sp3SatId::from_str("X01"), Err(ParsingError::UnknownSystem('X')));
        assert_eq!(Sp3SatId::from_str("L01"), Err(ParsingError::UnsupportedSystem('L')));
        assert!(matches!(Sp3SatId::from_str("G00"), Err(ParsingError::InvalidPrn(_))));
        assert!(matches!(Sp3SatId::from_str("G-1"), Err(ParsingError::InvalidPrn(_))));
        assert!(Sp3SatId::new(SV::new(Constellation::SBAS, 120)).is_err());
    }

    #[test]
    fn formatting() {
        let id = Sp3SatId::from_str("G1").unwrap();
        assert_eq!(id.to_string(), "G01");
        let opts = Sp3FormatOptions::default().with_fill(' ');
        assert_eq!(id.format(opts), "G 1");
        let id = Sp3SatId::from_str("R24").unwrap();
        assert_eq!(id.format(opts), "R24");
    }

    #[test]
    fn ordering() {
        let mut ids = ["R01", "G12", "E03", "G02", "C01"]
            .iter()
            .map(|s| Sp3SatId::from_str(s).unwrap())
            .collect::<Vec<_>>();
        ids.sort();
        let ids = ids.iter().map(|id| id.to_string()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["G02", "G12", "E03", "R01", "C01"]);
    }
}
