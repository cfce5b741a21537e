//! Neill tropospheric mapping model.
//!
//! Zenith delays are mapped to the line of sight with the Neill (1996)
//! mapping functions, whose coefficients are tabulated for 15°, 30°, 45°,
//! 60° and 75° of latitude. The dry coefficients follow a seasonal
//! variation and are corrected for the receiver height.
use bitflags::bitflags;

use crate::{
    angle::AngleReduced,
    epoch::day_of_year,
    error::Error,
    position::Position,
    prelude::Epoch,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// Inputs a correction model still needs
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct MissingInputs: u8 {
        const HEIGHT = 0x01;
        const LATITUDE = 0x02;
        const DAY_OF_YEAR = 0x04;
    }
}

/// Mapping functions are not defined below this elevation [°]
pub const MIN_ELEVATION_DEG: f64 = 3.0;

const WET_A: [f64; 5] = [0.00058021897, 0.00056794847, 0.00058118019, 0.00059727542, 0.00061641693];
const WET_B: [f64; 5] = [0.0014275268, 0.0015138625, 0.0014572752, 0.0015007428, 0.0017599082];
const WET_C: [f64; 5] = [0.043472961, 0.046729510, 0.043908931, 0.044626982, 0.054736038];

const DRY_A: [f64; 5] = [0.0012769934, 0.0012683230, 0.0012465397, 0.0012196049, 0.0012045996];
const DRY_B: [f64; 5] = [0.0029153695, 0.0029152299, 0.0029288445, 0.0029022565, 0.0029024912];
const DRY_C: [f64; 5] = [0.062610505, 0.062837393, 0.063721774, 0.063824265, 0.064258455];

// seasonal amplitudes
const DRY_A1: [f64; 5] = [0.0, 0.000012709626, 0.000026523662, 0.000034000452, 0.000041202191];
const DRY_B1: [f64; 5] = [0.0, 0.000021414979, 0.000030160779, 0.000072562722, 0.00011723375];
const DRY_C1: [f64; 5] = [0.0, 0.000090128400, 0.000043497037, 0.00084795348, 0.0017037206];

// height correction coefficients
const HEIGHT_A: f64 = 0.0000253;
const HEIGHT_B: f64 = 0.00549;
const HEIGHT_C: f64 = 0.00114;

/// Linear interpolation over the latitude bands, clamped
/// to the first and last band.
fn interpolate(table: &[f64; 5], abs_lat: f64) -> f64 {
    if abs_lat < 15.0 {
        table[0]
    } else if abs_lat < 75.0 {
        let i = (abs_lat / 15.0) as usize - 1;
        let frac = (abs_lat - 15.0 * (i + 1) as f64) / 15.0;
        table[i] + frac * (table[i + 1] - table[i])
    } else {
        table[4]
    }
}

/// Marini continued fraction, normalized to 1 at zenith
fn marini(a: f64, b: f64, c: f64, sin_el: f64) -> f64 {
    (1.0 + a / (1.0 + b / (1.0 + c))) / (sin_el + a / (sin_el + b / (sin_el + c)))
}

/// [NeillModel] builder. Gathers the receiver height, latitude and the
/// day of year, in any order.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct NeillBuilder {
    height_m: Option<f64>,
    latitude_deg: Option<f64>,
    day_of_year: Option<u16>,
}

impl NeillBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    /// Copies and sets receiver height above the ellipsoid [m]
    pub fn with_height(&self, height_m: f64) -> Self {
        let mut s = *self;
        s.height_m = Some(height_m);
        s
    }
    /// Copies and sets receiver geodetic latitude [°]
    pub fn with_latitude(&self, latitude_deg: f64) -> Self {
        let mut s = *self;
        s.latitude_deg = Some(latitude_deg);
        s
    }
    /// Copies and sets the day of year. Values outside 1..=366
    /// leave the day of year undefined.
    pub fn with_day_of_year(&self, doy: u16) -> Self {
        let mut s = *self;
        s.day_of_year = if (1..=366).contains(&doy) {
            Some(doy)
        } else {
            None
        };
        s
    }
    /// Copies and sets the day of year from this [Epoch]
    pub fn with_epoch(&self, t: Epoch) -> Self {
        self.with_day_of_year(day_of_year(t))
    }
    /// Copies and sets both height and latitude from the receiver [Position]
    pub fn with_receiver(&self, rx: &Position) -> Self {
        let geo = rx.geodetic();
        self.with_height(geo.height_m).with_latitude(geo.latitude_deg)
    }
    /// Inputs that are still undefined
    pub fn missing(&self) -> MissingInputs {
        let mut missing = MissingInputs::empty();
        if self.height_m.is_none() {
            missing |= MissingInputs::HEIGHT;
        }
        if self.latitude_deg.is_none() {
            missing |= MissingInputs::LATITUDE;
        }
        if self.day_of_year.is_none() {
            missing |= MissingInputs::DAY_OF_YEAR;
        }
        missing
    }
    pub fn build(&self) -> Result<NeillModel, Error> {
        match (self.height_m, self.latitude_deg, self.day_of_year) {
            (Some(height_m), Some(latitude_deg), Some(day_of_year)) => Ok(NeillModel {
                height_m,
                latitude_deg,
                day_of_year,
            }),
            _ => Err(Error::InvalidModel(self.missing())),
        }
    }
    /// Slant delay [m] at given elevation [°]
    pub fn correction(&self, elevation: f64) -> Result<f64, Error> {
        Ok(self.build()?.correction(elevation))
    }
    /// Slant delay [m] on the line of sight from `rx` to `sv`
    pub fn correction_between(&self, rx: &Position, sv: &Position) -> Result<f64, Error> {
        Ok(self.build()?.correction_between(rx, sv))
    }
}

/// Neill tropospheric model, ready to be evaluated
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NeillModel {
    height_m: f64,
    latitude_deg: f64,
    day_of_year: u16,
}

impl NeillModel {
    pub fn height_m(&self) -> f64 {
        self.height_m
    }
    pub fn latitude_deg(&self) -> f64 {
        self.latitude_deg
    }
    pub fn day_of_year(&self) -> u16 {
        self.day_of_year
    }
    /// Hydrostatic zenith delay [m]
    pub fn dry_zenith_delay(&self) -> f64 {
        // 1.013 * 2.27
        2.29951 * (-0.000116 * self.height_m).exp()
    }
    /// Wet zenith delay [m]
    pub fn wet_zenith_delay(&self) -> f64 {
        0.1
    }
    /// Hydrostatic mapping function at given elevation [°]
    pub fn dry_mapping(&self, elevation: f64) -> f64 {
        if elevation < MIN_ELEVATION_DEG {
            return 0.0;
        }
        let abs_lat = self.latitude_deg.abs();

        // phase: mid winter, shifted by half a year in the southern hemisphere
        let mut t = self.day_of_year as f64 - 28.0;
        if self.latitude_deg < 0.0 {
            t += 365.25 / 2.0;
        }
        let ct = AngleReduced::from_degrees(t * 360.0 / 365.25).cos();

        let (a, b, c) = if abs_lat < 15.0 {
            (DRY_A[0], DRY_B[0], DRY_C[0])
        } else {
            (
                interpolate(&DRY_A, abs_lat) - ct * interpolate(&DRY_A1, abs_lat),
                interpolate(&DRY_B, abs_lat) - ct * interpolate(&DRY_B1, abs_lat),
                interpolate(&DRY_C, abs_lat) - ct * interpolate(&DRY_C1, abs_lat),
            )
        };

        let se = AngleReduced::from_degrees(elevation).sin();
        let map = marini(a, b, c, se);
        map + self.height_m / 1000.0 * (1.0 / se - marini(HEIGHT_A, HEIGHT_B, HEIGHT_C, se))
    }
    /// Wet mapping function at given elevation [°]
    pub fn wet_mapping(&self, elevation: f64) -> f64 {
        if elevation < MIN_ELEVATION_DEG {
            return 0.0;
        }
        let abs_lat = self.latitude_deg.abs();
        let se = AngleReduced::from_degrees(elevation).sin();
        marini(
            interpolate(&WET_A, abs_lat),
            interpolate(&WET_B, abs_lat),
            interpolate(&WET_C, abs_lat),
            se,
        )
    }
    /// Slant delay [m] at given elevation [°]. Null below 3°.
    pub fn correction(&self, elevation: f64) -> f64 {
        if elevation < MIN_ELEVATION_DEG {
            return 0.0;
        }
        self.dry_zenith_delay() * self.dry_mapping(elevation)
            + self.wet_zenith_delay() * self.wet_mapping(elevation)
    }
    /// Slant delay [m] on the line of sight from `rx` to `sv`
    pub fn correction_between(&self, rx: &Position, sv: &Position) -> f64 {
        self.correction(rx.elevation_geodetic(sv))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn latitude_bands() {
        assert_eq!(interpolate(&WET_A, 0.0), WET_A[0]);
        assert_eq!(interpolate(&WET_A, 14.9), WET_A[0]);
        assert_eq!(interpolate(&WET_A, 15.0), WET_A[0]);
        assert_eq!(interpolate(&WET_A, 30.0), WET_A[1]);
        assert_eq!(interpolate(&WET_A, 75.0), WET_A[4]);
        assert_eq!(interpolate(&WET_A, 89.0), WET_A[4]);
        let mid = interpolate(&WET_B, 37.5);
        assert!((mid - (WET_B[1] + WET_B[2]) / 2.0).abs() < 1E-15);
    }
    #[test]
    fn zenith_mapping_is_unity() {
        let model = NeillBuilder::new()
            .with_height(0.0)
            .with_latitude(45.0)
            .with_day_of_year(180)
            .build()
            .unwrap();
        assert!((model.dry_mapping(90.0) - 1.0).abs() < 1E-12);
        assert!((model.wet_mapping(90.0) - 1.0).abs() < 1E-12);
        assert_eq!(model.wet_zenith_delay(), 0.1);
        assert!((model.dry_zenith_delay() - 2.29951).abs() < 1E-12);
    }
    #[test]
    fn below_cutoff() {
        let model = NeillBuilder::new()
            .with_height(100.0)
            .with_latitude(-20.0)
            .with_day_of_year(12)
            .build()
            .unwrap();
        assert_eq!(model.correction(2.99), 0.0);
        assert_eq!(model.dry_mapping(-10.0), 0.0);
        assert_eq!(model.wet_mapping(0.0), 0.0);
        assert!(model.correction(3.0) > 0.0);
    }
    #[test]
    fn missing_inputs() {
        let builder = NeillBuilder::new().with_height(10.0);
        assert_eq!(
            builder.missing(),
            MissingInputs::LATITUDE | MissingInputs::DAY_OF_YEAR
        );
        match builder.correction(45.0) {
            Err(Error::InvalidModel(missing)) => {
                assert!(missing.contains(MissingInputs::LATITUDE));
                assert!(missing.contains(MissingInputs::DAY_OF_YEAR));
                assert!(!missing.contains(MissingInputs::HEIGHT));
            },
            other => panic!("unexpected result: {:?}", other),
        }
        let builder = builder.with_latitude(10.0).with_day_of_year(367);
        assert_eq!(builder.missing(), MissingInputs::DAY_OF_YEAR);
        assert!(builder.build().is_err());
        assert!(builder.with_day_of_year(366).build().is_ok());
    }
}
