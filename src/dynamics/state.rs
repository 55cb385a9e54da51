use std::f64::consts::PI;

use nalgebra::Vector2;

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const G0: f64 = 9.81; // m/s^2, used by both gravity and thrust conversion
pub const GRAVITATIONAL_CONSTANT: f64 = 6.6743e-11; // m^3/(kg s^2)
pub const EARTH_MASS: f64 = 5.972e24; // kg
pub const EARTH_RADIUS: f64 = 6_378_000.0; // m
pub const EARTH_ROTATION_SPEED: f64 = 460.0; // m/s at the equator

pub const DRY_MASS_FLOOR: f64 = 200.0; // kg
pub const VELOCITY_EPSILON: f64 = 1e-8; // m/s

// ---------------------------------------------------------------------------
// Vehicle state
// ---------------------------------------------------------------------------

/// One snapshot of the vehicle. Frame: x downrange, y up, origin at release.
///
/// `accel`, `air_density`, `thrust` and `fuel_flow` are the force-model
/// outputs that produced this record (evaluated at the previous record, or
/// at this one for the initial condition).
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleState {
    pub time: f64,            // s
    pub pos: Vector2<f64>,    // m
    pub vel: Vector2<f64>,    // m/s
    pub accel: Vector2<f64>,  // m/s^2
    pub mass: f64,            // kg
    pub air_density: f64,     // kg/m^3
    pub thrust: f64,          // N (magnitude, signed with vx)
    pub fuel_flow: f64,       // kg/s
}

impl VehicleState {
    pub fn altitude(&self) -> f64 {
        self.pos.y
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }

    /// Flight-path angle above the horizontal, rad.
    pub fn flight_path_angle(&self) -> f64 {
        if self.speed() < VELOCITY_EPSILON {
            0.0
        } else {
            self.vel.y.atan2(self.vel.x)
        }
    }

    /// Remaining onboard propellant above the given dry mass.
    pub fn propellant_mass(&self, dry_mass_floor: f64) -> f64 {
        (self.mass - dry_mass_floor).max(0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.time.is_finite()
            && self.pos.iter().all(|v| v.is_finite())
            && self.vel.iter().all(|v| v.is_finite())
            && self.accel.iter().all(|v| v.is_finite())
            && self.mass.is_finite()
            && self.air_density.is_finite()
            && self.thrust.is_finite()
            && self.fuel_flow.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Geometry (fixed for a run)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub radius: f64,      // m
    pub intake_area: f64, // m^2
}

impl Geometry {
    /// Geometry with the intake covering `intake_fraction` (0..=1) of the frontal area.
    pub fn from_fraction(radius: f64, intake_fraction: f64) -> Self {
        Self {
            radius,
            intake_area: intake_fraction * PI * radius * radius,
        }
    }

    pub fn frontal_area(&self) -> f64 {
        PI * self.radius * self.radius
    }
}
