use nalgebra::Vector2;

use crate::dynamics::state::{Geometry, VehicleState};
use crate::physics::aerodynamics::{velocity_unit, DragModel};
use crate::physics::atmosphere::AtmosphereTable;
use crate::physics::gravity::GravityModel;
use crate::physics::propulsion::{PropulsionInput, ThrustModel};

// ---------------------------------------------------------------------------
// Instantaneous force evaluation (2DOF point mass)
// ---------------------------------------------------------------------------

/// Everything the force model computed for one state.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceSample {
    pub accel: Vector2<f64>,      // m/s^2
    pub thrust: f64,              // N
    pub thrust_vec: Vector2<f64>, // N
    pub drag: Vector2<f64>,       // N
    pub gravity_force: f64,       // N, downward
    pub fuel_flow: f64,           // kg/s
    pub oxygen_flow: f64,         // kg/s
    pub air_density: f64,         // kg/m^3
    pub unit: Vector2<f64>,       // velocity direction, zero below the guard
}

/// Combines propulsion, drag and gravity into net acceleration and fuel flow.
///
/// Borrows the shared atmosphere and thrust strategy; holds no state of its
/// own, so one accumulator can serve every step of a run.
pub struct ForceAccumulator<'a> {
    pub atmosphere: &'a AtmosphereTable,
    pub engine: &'a dyn ThrustModel,
    pub gravity: GravityModel,
    pub drag: DragModel,
    pub drag_coefficient: f64,
}

impl<'a> ForceAccumulator<'a> {
    /// Forces acting on `state`:
    ///   1. Thrust - engine output along the velocity unit vector
    ///   2. Drag   - against the velocity (vector or legacy per-axis)
    ///   3. Gravity - vertical only
    pub fn evaluate(&self, state: &VehicleState, geometry: &Geometry) -> ForceSample {
        let unit = velocity_unit(&state.vel);
        let air_density = self.atmosphere.density(state.pos.y);

        let engine = self.engine.evaluate(&PropulsionInput {
            air_density,
            intake_area: geometry.intake_area,
            horizontal_velocity: state.vel.x,
            mass: state.mass,
        });
        let thrust_vec = unit * engine.thrust;

        let drag = self.drag.force(
            air_density,
            &state.vel,
            &unit,
            self.drag_coefficient,
            geometry.radius,
        );

        let gravity_force = self.gravity.force(state.pos.y, state.mass);

        let accel = Vector2::new(
            (thrust_vec.x + drag.x) / state.mass,
            (thrust_vec.y + drag.y - gravity_force) / state.mass,
        );

        ForceSample {
            accel,
            thrust: engine.thrust,
            thrust_vec,
            drag,
            gravity_force,
            fuel_flow: engine.fuel_flow,
            oxygen_flow: engine.oxygen_flow,
            air_density,
            unit,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
