//! Angle stored as its sine and cosine
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Angle reduced to its (sine, cosine) pair, for repeated
/// trigonometric use without recomputation.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AngleReduced {
    sin: f64,
    cos: f64,
}

impl Default for AngleReduced {
    fn default() -> Self {
        Self { sin: 0.0, cos: 1.0 }
    }
}

impl AngleReduced {
    pub fn from_radians(rad: f64) -> Self {
        Self {
            sin: rad.sin(),
            cos: rad.cos(),
        }
    }
    pub fn from_degrees(deg: f64) -> Self {
        Self::from_radians(deg.to_radians())
    }
    /// Builds from a sine value, the angle is assumed in [-90°, 90°]
    pub fn from_sin(sin: f64) -> Self {
        Self {
            sin,
            cos: (1.0 - sin * sin).max(0.0).sqrt(),
        }
    }
    /// Builds from a cosine value, the angle is assumed in [0°, 180°]
    pub fn from_cos(cos: f64) -> Self {
        Self {
            sin: (1.0 - cos * cos).max(0.0).sqrt(),
            cos,
        }
    }
    pub fn sin(&self) -> f64 {
        self.sin
    }
    pub fn cos(&self) -> f64 {
        self.cos
    }
    pub fn tan(&self) -> f64 {
        self.sin / self.cos
    }
    pub fn radians(&self) -> f64 {
        self.sin.atan2(self.cos)
    }
    pub fn degrees(&self) -> f64 {
        self.radians().to_degrees()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn reduced_angles() {
        let a = AngleReduced::from_degrees(30.0);
        assert!((a.sin() - 0.5).abs() < 1E-12);
        assert!((a.degrees() - 30.0).abs() < 1E-12);
        let b = AngleReduced::from_sin(0.5);
        assert!((b.cos() - a.cos()).abs() < 1E-12);
        let c = AngleReduced::from_cos(a.cos());
        assert!((c.sin() - 0.5).abs() < 1E-12);
        let d = AngleReduced::from_radians(-std::f64::consts::FRAC_PI_4);
        assert!((d.tan() + 1.0).abs() < 1E-12);
        assert_eq!(AngleReduced::default().degrees(), 0.0);
    }
}
