//! Observation header merging
use std::collections::BTreeSet;

use log::warn;
use thiserror::Error;

use crate::observation::{FullOrdering, ObsType, ObservationHeader};

/// [Merge] specific Errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MergeError {
    /// Nothing to merge
    #[error("no header to merge")]
    NoHeaders,
}

/// Merge Trait is implemented to combine datasets
pub trait Merge {
    /// Merges "rhs" into a copy of self
    fn merge(&self, rhs: &Self) -> Result<Self, MergeError>
    where
        Self: Sized;
    /// [Self::merge] mutable implementation.
    fn merge_mut(&mut self, rhs: &Self) -> Result<(), MergeError>;
}

impl Merge for ObservationHeader {
    fn merge(&self, rhs: &Self) -> Result<Self, MergeError> {
        let mut lhs = self.clone();
        lhs.merge_mut(rhs)?;
        Ok(lhs)
    }
    /// Comments are combined (sorted, unique), observation types
    /// are reduced to the ones both headers share.
    fn merge_mut(&mut self, rhs: &Self) -> Result<(), MergeError> {
        let comments = self
            .comments
            .iter()
            .chain(rhs.comments.iter())
            .cloned()
            .collect::<BTreeSet<_>>();
        self.comments = comments.into_iter().collect();

        let common = self
            .obs_set()
            .intersection(&rhs.obs_set())
            .cloned()
            .collect::<Vec<_>>();
        if common.is_empty() {
            warn!(
                "{}/{}: no observation type in common",
                self.marker_name, rhs.marker_name
            );
        }
        self.obs_types = common;
        Ok(())
    }
}

/// Left fold over [ObservationHeader]s: the first header seeds the result,
/// each following header is merged into it.
/// ```
/// use std::str::FromStr;
/// use gnss_nav::observation::{HeaderMerge, ObsType, ObservationHeader};
///
/// let l1 = ObsType::from_str("L1").unwrap();
/// let c1 = ObsType::from_str("C1").unwrap();
///
/// let a = ObservationHeader::default()
///     .with_obs_types(&[l1.clone(), c1.clone()]);
/// let b = ObservationHeader::default()
///     .with_obs_types(&[c1.clone()]);
///
/// let merged = HeaderMerge::from_headers([&a, &b]).unwrap();
/// assert_eq!(merged.obs_set().len(), 1);
/// assert!(merged.obs_set().contains(&c1));
/// ```
#[derive(Debug, Default, Clone)]
pub struct HeaderMerge {
    header: Option<ObservationHeader>,
    obs_set: BTreeSet<ObsType>,
}

impl HeaderMerge {
    pub fn new() -> Self {
        Self::default()
    }
    /// Merges all headers
    pub fn from_headers<'a, I: IntoIterator<Item = &'a ObservationHeader>>(
        headers: I,
    ) -> Result<Self, MergeError> {
        let mut s = Self::new();
        for header in headers {
            s.touch(header)?;
        }
        if s.header.is_none() {
            return Err(MergeError::NoHeaders);
        }
        Ok(s)
    }
    /// Merges one more header
    pub fn touch(&mut self, header: &ObservationHeader) -> Result<(), MergeError> {
        match &mut self.header {
            None => {
                self.obs_set = header.obs_set();
                self.header = Some(header.clone());
            },
            Some(merged) => {
                merged.merge_mut(header)?;
                self.obs_set = merged.obs_set();
            },
        }
        Ok(())
    }
    /// Merged header, once at least one header was merged
    pub fn header(&self) -> Option<&ObservationHeader> {
        self.header.as_ref()
    }
    /// Observation types all merged headers share
    pub fn obs_set(&self) -> &BTreeSet<ObsType> {
        &self.obs_set
    }
    /// [FullOrdering] over the common observation types
    pub fn full_ordering(&self) -> FullOrdering {
        FullOrdering::new(self.obs_set.clone())
    }
}
