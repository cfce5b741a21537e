//! ECEF to local East North Up frame rotation
use nalgebra::{Matrix3, Vector3};

use crate::angle::AngleReduced;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Satellite state: position and velocity, plus clock terms
/// that are frame independent.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SvState {
    /// Position [m]
    pub position: Vector3<f64>,
    /// Velocity [m/s]
    pub velocity: Vector3<f64>,
    /// Clock bias [s]
    pub clock_bias: f64,
    /// Clock drift [s/s]
    pub clock_drift: f64,
    /// Relativistic correction [s]
    pub relativity: f64,
}

/// Rotation from ECEF to the ENU frame of a reference location
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnuRotation {
    rotation: Matrix3<f64>,
}

impl EnuRotation {
    /// Builds the rotation for given reference geodetic latitude and longitude [°]
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self::from_reduced(
            AngleReduced::from_degrees(latitude_deg),
            AngleReduced::from_degrees(longitude_deg),
        )
    }
    pub fn from_reduced(lat: AngleReduced, lon: AngleReduced) -> Self {
        #[rustfmt::skip]
        let rotation = Matrix3::new(
            -lon.sin(), lon.cos(), 0.0,
            -lat.sin() * lon.cos(), -lat.sin() * lon.sin(), lat.cos(),
            lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin(),
        );
        Self { rotation }
    }
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.rotation
    }
    /// Rotates an ECEF vector into (East, North, Up)
    pub fn to_enu(&self, ecef: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * ecef
    }
    /// Rotates position and velocity, clock terms are preserved
    pub fn rotate_state(&self, state: &SvState) -> SvState {
        SvState {
            position: self.to_enu(&state.position),
            velocity: self.to_enu(&state.velocity),
            ..*state
        }
    }
}
