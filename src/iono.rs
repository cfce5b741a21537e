//! Klobuchar ionospheric model (IS-GPS-200 figure 20-4)
use std::f64::consts::PI;

use crate::{
    carrier::Carrier,
    constants::SPEED_OF_LIGHT_M_S,
    epoch::to_week_second,
    position::Position,
    prelude::{Epoch, TimeScale},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Klobuchar parameters region
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KbRegionCode {
    /// Worlwide (GPS) coverage
    #[default]
    WideArea = 0,
    /// QZSS Japanese area
    JapanArea = 1,
}

/// Klobuchar model, as broadcast by GPS LNAV and BeiDou D1
#[derive(Default, Debug, Copy, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KbModel {
    /// Alpha coefficients
    /// ((sec), (sec.semi-circle⁻¹), (sec.semi-circle⁻²), (sec.semi-circle⁻³))
    pub alpha: (f64, f64, f64, f64),
    /// Beta coefficients
    /// ((sec), (sec.semi-circle⁻¹), (sec.semi-circle⁻²), (sec.semi-circle⁻³))
    pub beta: (f64, f64, f64, f64),
    /// Region flag
    pub region: KbRegionCode,
}

impl KbModel {
    pub fn new(alpha: [f64; 4], beta: [f64; 4]) -> Self {
        Self {
            alpha: (alpha[0], alpha[1], alpha[2], alpha[3]),
            beta: (beta[0], beta[1], beta[2], beta[3]),
            region: KbRegionCode::WideArea,
        }
    }

    /// L1 ionospheric delay [s] for given geodetic elevation and azimuth [°]
    /// of the vehicle, seen from receiver geodetic latitude and longitude [°].
    pub fn seconds_delay(&self, t: Epoch, elevation: f64, azimuth: f64, lat_deg: f64, lon_deg: f64) -> f64 {
        let (_, sow) = to_week_second(t, TimeScale::GPST);
        let azimuth = azimuth.to_radians();
        // semicircles
        let sv_e = elevation / 180.0;
        let phi_u = lat_deg / 180.0;
        let lambda_u = lon_deg / 180.0;

        let psi = 0.0137 / (sv_e + 0.11) - 0.022;
        let phi_i = (phi_u + psi * azimuth.cos()).clamp(-0.416, 0.416);
        let lambda_i = lambda_u + psi * azimuth.sin() / (phi_i * PI).cos();
        let phi_m = phi_i + 0.064 * ((lambda_i - 1.617) * PI).cos();

        let amplitude = (self.alpha.0
            + phi_m * (self.alpha.1 + phi_m * (self.alpha.2 + phi_m * self.alpha.3)))
            .max(0.0);
        let period = (self.beta.0
            + phi_m * (self.beta.1 + phi_m * (self.beta.2 + phi_m * self.beta.3)))
            .max(72_000.0);

        let t_s = (43_200.0 * lambda_i + sow).rem_euclid(86_400.0);
        let x = 2.0 * PI * (t_s - 50_400.0) / period;
        let obliquity = 1.0 + 16.0 * (0.53 - sv_e).powi(3);

        if x.abs() < 1.57 {
            obliquity * (5.0E-9 + amplitude * (1.0 + x * x * (-0.5 + x * x / 24.0)))
        } else {
            obliquity * 5.0E-9
        }
    }

    /// Ionospheric delay [m] on given [Carrier], for the line of sight
    /// between the receiver `rx` and the vehicle `sv` at epoch `t`.
    pub fn meters_delay(&self, t: Epoch, rx: &Position, sv: &Position, carrier: Carrier) -> f64 {
        let geo = rx.geodetic();
        let elevation = rx.elevation_geodetic(sv);
        let azimuth = rx.azimuth_geodetic(sv);
        let delay = self.seconds_delay(t, elevation, azimuth, geo.latitude_deg, geo.longitude_deg);
        let ratio = Carrier::L1.frequency() / carrier.frequency();
        delay * SPEED_OF_LIGHT_M_S * ratio * ratio
    }
}
