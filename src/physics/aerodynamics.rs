use std::f64::consts::PI;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::dynamics::state::VELOCITY_EPSILON;

/// Drag formulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DragModel {
    /// Quadratic drag on the speed, directed against the velocity unit vector.
    #[default]
    Vector,
    /// Legacy: quadratic drag applied independently per axis.
    ///
    /// Not a physical vector drag. For oblique flight the summed magnitude
    /// exceeds the `Vector` result, so keep it for reproducing old runs only.
    PerAxis,
}

/// Frontal area presented along the direction of travel, m^2.
pub fn cross_section(radius: f64) -> f64 {
    PI * radius * radius
}

impl DragModel {
    /// Drag force (N) for velocity `vel` with precomputed unit vector `unit`.
    ///
    /// `unit` is zero when the speed is under the epsilon guard, which makes
    /// both variants return zero.
    pub fn force(
        self,
        air_density: f64,
        vel: &Vector2<f64>,
        unit: &Vector2<f64>,
        cd: f64,
        radius: f64,
    ) -> Vector2<f64> {
        let k = 0.5 * cd * air_density * cross_section(radius);
        match self {
            DragModel::Vector => {
                let speed_sq = vel.norm_squared();
                -(unit * (k * speed_sq))
            }
            DragModel::PerAxis => {
                if unit.x == 0.0 && unit.y == 0.0 {
                    return Vector2::zeros();
                }
                Vector2::new(-k * vel.x * vel.x.abs(), -k * vel.y * vel.y.abs())
            }
        }
    }
}

/// Unit vector along `vel`, or zero when the speed is below the guard.
pub fn velocity_unit(vel: &Vector2<f64>) -> Vector2<f64> {
    let speed = vel.norm();
    if speed < VELOCITY_EPSILON {
        Vector2::zeros()
    } else {
        vel / speed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
