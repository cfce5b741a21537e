//! ECEF positions and geodetic conversions (WGS84)
use map_3d::{ecef2aer, ecef2geodetic, rad2deg, Ellipsoid};
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geodetic coordinates
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Geodetic {
    /// Latitude [°]
    pub latitude_deg: f64,
    /// Longitude [°], in ]-180°, 180°]
    pub longitude_deg: f64,
    /// Height above the ellipsoid [m]
    pub height_m: f64,
}

/// Position expressed in ECEF [m]
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    ecef: Vector3<f64>,
}

impl From<Vector3<f64>> for Position {
    fn from(ecef: Vector3<f64>) -> Self {
        Self { ecef }
    }
}

impl From<(f64, f64, f64)> for Position {
    fn from(xyz: (f64, f64, f64)) -> Self {
        Self::new(xyz.0, xyz.1, xyz.2)
    }
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            ecef: Vector3::new(x, y, z),
        }
    }
    /// ECEF coordinates [m]
    pub fn ecef(&self) -> Vector3<f64> {
        self.ecef
    }
    /// ECEF to geodetic conversion
    pub fn geodetic(&self) -> Geodetic {
        let (lat, lon, alt) =
            ecef2geodetic(self.ecef[0], self.ecef[1], self.ecef[2], Ellipsoid::WGS84);
        Geodetic {
            latitude_deg: rad2deg(lat),
            longitude_deg: rad2deg(lon),
            height_m: alt,
        }
    }
    /// (azimuth, elevation) [rad] of `target` seen from this position
    fn aer(&self, target: &Position) -> (f64, f64) {
        let (lat, lon, alt) =
            ecef2geodetic(self.ecef[0], self.ecef[1], self.ecef[2], Ellipsoid::WGS84);
        let (azim, elev, _) = ecef2aer(
            target.ecef[0],
            target.ecef[1],
            target.ecef[2],
            lat,
            lon,
            alt,
            Ellipsoid::WGS84,
        );
        (azim, elev)
    }
    /// Geodetic elevation [°] of `target` seen from this position
    pub fn elevation_geodetic(&self, target: &Position) -> f64 {
        rad2deg(self.aer(target).1)
    }
    /// Geodetic azimuth [°], in [0°, 360°[, of `target` seen from this position
    pub fn azimuth_geodetic(&self, target: &Position) -> f64 {
        rad2deg(self.aer(target).0).rem_euclid(360.0)
    }
}
