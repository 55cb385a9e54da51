use serde::{Deserialize, Serialize};

use crate::dynamics::state::{EARTH_MASS, EARTH_RADIUS, G0, GRAVITATIONAL_CONSTANT};

/// Gravity variant. Both act on the vertical channel only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GravityModel {
    /// Flat-earth `g0 = 9.81 m/s^2` at every altitude.
    Constant,
    /// Point-mass Earth: `G M / (R + h)^2`.
    #[default]
    InverseSquare,
}

impl GravityModel {
    /// Gravitational acceleration magnitude (m/s^2, positive down).
    pub fn acceleration(self, altitude: f64) -> f64 {
        match self {
            GravityModel::Constant => G0,
            GravityModel::InverseSquare => inverse_square(altitude),
        }
    }

    /// Downward gravitational force on `mass` kg at `altitude` m.
    pub fn force(self, altitude: f64, mass: f64) -> f64 {
        mass * self.acceleration(altitude)
    }
}

/// Newtonian gravity above the reference radius. Altitude is not clamped.
pub fn inverse_square(altitude: f64) -> f64 {
    let r = EARTH_RADIUS + altitude;
    GRAVITATIONAL_CONSTANT * EARTH_MASS / (r * r)
}
