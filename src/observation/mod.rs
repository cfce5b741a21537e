//! RINEX observation records: comparison, header merging and filtering
use std::{
    collections::{BTreeMap, BTreeSet},
    str::FromStr,
};

use bitflags::bitflags;
use thiserror::Error;

mod flag;
mod snr;

pub mod compare;
pub mod filter;
pub mod merge;

pub use compare::{same_epoch, FullOrdering, RecordOrdering, TimeOrdering};
pub use flag::EpochFlag;
pub use merge::{HeaderMerge, Merge, MergeError};
pub use snr::SNR;

use crate::prelude::{Epoch, SV};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("unknown observable \"{0}\"")]
    UnknownObservable(String),
    #[error("malformed observable \"{0}\"")]
    MalformedDescriptor(String),
}

/// Observation type, as listed in the header
/// "# / TYPES OF OBSERV" field (C1, L2, P1, D1, S2 ..)
#[derive(Debug, Clone, PartialEq, PartialOrd, Hash, Ord, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ObsType {
    /// Carrier phase observation
    Phase(String),
    /// Doppler shift observation
    Doppler(String),
    /// Signal strength observation
    SSI(String),
    /// Pseudo range observation
    PseudoRange(String),
}

impl ObsType {
    pub fn code(&self) -> &str {
        match self {
            Self::Phase(c) | Self::Doppler(c) | Self::SSI(c) | Self::PseudoRange(c) => c,
        }
    }
    pub fn is_phase_observable(&self) -> bool {
        matches!(self, Self::Phase(_))
    }
    pub fn is_pseudorange_observable(&self) -> bool {
        matches!(self, Self::PseudoRange(_))
    }
}

impl FromStr for ObsType {
    type Err = ParsingError;
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let code = content.trim().to_uppercase();
        if !(2..=3).contains(&code.len()) || !code.is_ascii() {
            return Err(ParsingError::MalformedDescriptor(content.to_string()));
        }
        match &code[..1] {
            "L" => Ok(Self::Phase(code)),
            "D" => Ok(Self::Doppler(code)),
            "S" => Ok(Self::SSI(code)),
            "C" | "P" => Ok(Self::PseudoRange(code)),
            _ => Err(ParsingError::UnknownObservable(content.to_string())),
        }
    }
}

impl std::fmt::Display for ObsType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

bitflags! {
    /// Loss of lock indication
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct LliFlags: u8 {
        /// Current epoch is marked Ok or Unknown status
        const OK_OR_UNKNOWN = 0x00;
        /// Lock lost between previous observation and current observation,
        /// cycle slip is possible
        const LOCK_LOSS = 0x01;
        /// Half cycle slip marker
        const HALF_CYCLE_SLIP = 0x02;
        /// Observing under anti spoofing,
        /// might suffer from decreased SNR
        const UNDER_ANTI_SPOOFING = 0x04;
    }
}

/// One measurement
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObservationData {
    /// Physical measurement
    pub obs: f64,
    /// Lock loss indicator
    pub lli: Option<LliFlags>,
    /// Signal strength indicator
    pub ssi: Option<SNR>,
}

impl ObservationData {
    pub fn new(obs: f64) -> Self {
        Self {
            obs,
            lli: None,
            ssi: None,
        }
    }
    pub fn with_lli(&self, lli: LliFlags) -> Self {
        let mut s = *self;
        s.lli = Some(lli);
        s
    }
    pub fn with_ssi(&self, ssi: SNR) -> Self {
        let mut s = *self;
        s.ssi = Some(ssi);
        s
    }
    /// LLI value, 0 when missing
    pub fn lli_value(&self) -> u8 {
        self.lli.map(|lli| lli.bits()).unwrap_or(0)
    }
    /// SSI value, 0 when missing
    pub fn ssi_value(&self) -> u8 {
        self.ssi.map(|ssi| ssi.code()).unwrap_or(0)
    }
}

/// Observations of one vehicle, per [ObsType]
pub type SvObservations = BTreeMap<ObsType, ObservationData>;

/// One observation epoch
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObservationRecord {
    pub epoch: Epoch,
    pub flag: EpochFlag,
    /// Receiver clock offset [s]
    pub clock_offset: Option<f64>,
    pub observations: BTreeMap<SV, SvObservations>,
}

impl ObservationRecord {
    pub fn new(epoch: Epoch) -> Self {
        Self {
            epoch,
            ..Default::default()
        }
    }
    pub fn with_flag(&self, flag: EpochFlag) -> Self {
        let mut s = self.clone();
        s.flag = flag;
        s
    }
    pub fn with_clock_offset(&self, offset: f64) -> Self {
        let mut s = self.clone();
        s.clock_offset = Some(offset);
        s
    }
    /// Adds (or replaces) one measurement
    pub fn with_observation(&self, sv: SV, obs_type: ObsType, data: ObservationData) -> Self {
        let mut s = self.clone();
        s.observations.entry(sv).or_default().insert(obs_type, data);
        s
    }
    /// Measurement of `sv`, if any
    pub fn observation(&self, sv: SV, obs_type: &ObsType) -> Option<&ObservationData> {
        self.observations.get(&sv)?.get(obs_type)
    }
    /// Number of vehicles observed at this epoch
    pub fn sv_count(&self) -> usize {
        self.observations.len()
    }
}

/// Observation header, restricted to what merging needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObservationHeader {
    pub marker_name: String,
    /// Program that created this file
    pub program: String,
    /// Agency that created this file
    pub agency: String,
    pub comments: Vec<String>,
    /// Observation types, in header order
    pub obs_types: Vec<ObsType>,
}

impl ObservationHeader {
    pub fn with_marker_name(&self, name: &str) -> Self {
        let mut s = self.clone();
        s.marker_name = name.to_string();
        s
    }
    pub fn with_program(&self, program: &str) -> Self {
        let mut s = self.clone();
        s.program = program.to_string();
        s
    }
    pub fn with_agency(&self, agency: &str) -> Self {
        let mut s = self.clone();
        s.agency = agency.to_string();
        s
    }
    pub fn with_comment(&self, comment: &str) -> Self {
        let mut s = self.clone();
        s.comments.push(comment.to_string());
        s
    }
    pub fn with_obs_types(&self, obs_types: &[ObsType]) -> Self {
        let mut s = self.clone();
        s.obs_types = obs_types.to_vec();
        s
    }
    /// Observation types, as a set
    pub fn obs_set(&self) -> BTreeSet<ObsType> {
        self.obs_types.iter().cloned().collect()
    }
}
