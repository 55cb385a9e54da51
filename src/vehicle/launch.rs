use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dynamics::state::{Geometry, VehicleState};

// ---------------------------------------------------------------------------
// Launch parameters (as collected from the user)
// ---------------------------------------------------------------------------

/// Initial condition of a run, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchParams {
    pub initial_mass: f64,        // kg, must exceed the dry mass floor
    pub velocity: f64,            // m/s, ~100 is the low end for ramjet operation
    pub angle_of_attack_deg: f64, // deg above horizontal
    pub radius: f64,              // m, frontal cross-section radius
    pub intake_area_percent: f64, // 0..=100 of the frontal area
}

#[derive(Debug, Error, PartialEq)]
pub enum LaunchError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("radius must be positive, got {0} m")]
    NonPositiveRadius(f64),
    #[error("initial mass {mass} kg must exceed the dry mass floor of {floor} kg")]
    MassAtOrBelowFloor { mass: f64, floor: f64 },
    #[error("intake area must be between 0 and 100 %, got {0}")]
    IntakeOutOfRange(f64),
    #[error("initial velocity must be non-negative, got {0} m/s")]
    NegativeVelocity(f64),
}

impl LaunchParams {
    /// Check the parameters against the model's assumptions.
    pub fn validate(self, dry_mass_floor: f64) -> Result<ValidatedLaunch, LaunchError> {
        for (field, value) in [
            ("initial mass", self.initial_mass),
            ("velocity", self.velocity),
            ("angle of attack", self.angle_of_attack_deg),
            ("radius", self.radius),
            ("intake area", self.intake_area_percent),
        ] {
            if !value.is_finite() {
                return Err(LaunchError::NotFinite { field });
            }
        }
        if self.radius <= 0.0 {
            return Err(LaunchError::NonPositiveRadius(self.radius));
        }
        if self.initial_mass <= dry_mass_floor {
            return Err(LaunchError::MassAtOrBelowFloor {
                mass: self.initial_mass,
                floor: dry_mass_floor,
            });
        }
        if !(0.0..=100.0).contains(&self.intake_area_percent) {
            return Err(LaunchError::IntakeOutOfRange(self.intake_area_percent));
        }
        if self.velocity < 0.0 {
            return Err(LaunchError::NegativeVelocity(self.velocity));
        }

        Ok(ValidatedLaunch {
            params: self,
            geometry: Geometry::from_fraction(self.radius, self.intake_area_percent / 100.0),
        })
    }
}

// ---------------------------------------------------------------------------
// Validated launch (the only form the integrator accepts)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedLaunch {
    params: LaunchParams,
    geometry: Geometry,
}

impl ValidatedLaunch {
    pub fn params(&self) -> &LaunchParams {
        &self.params
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// State at t = 0: origin, velocity split by the angle of attack.
    ///
    /// Force-model channels are zero here; the runner fills them in.
    pub fn initial_state(&self) -> VehicleState {
        let angle = self.params.angle_of_attack_deg.to_radians();
        VehicleState {
            time: 0.0,
            pos: Vector2::zeros(),
            vel: Vector2::new(self.params.velocity * angle.cos(), self.params.velocity * angle.sin()),
            accel: Vector2::zeros(),
            mass: self.params.initial_mass,
            air_density: 0.0,
            thrust: 0.0,
            fuel_flow: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Preset launches
// ---------------------------------------------------------------------------

pub mod presets {
    use super::LaunchParams;

    /// 500 kg demonstrator released at 150 m/s, 10 deg, half-area intake.
    pub fn demonstrator() -> LaunchParams {
        LaunchParams {
            initial_mass: 500.0,
            velocity: 150.0,
            angle_of_attack_deg: 10.0,
            radius: 1.0,
            intake_area_percent: 50.0,
        }
    }

    /// Heavier vehicle released supersonic at a shallow angle.
    pub fn cruiser() -> LaunchParams {
        LaunchParams {
            initial_mass: 2_000.0,
            velocity: 700.0,
            angle_of_attack_deg: 5.0,
            radius: 0.6,
            intake_area_percent: 35.0,
        }
    }
}
