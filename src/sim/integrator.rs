use crate::dynamics::forces::ForceAccumulator;
use crate::dynamics::state::{Geometry, VehicleState};

// ---------------------------------------------------------------------------
// Explicit Euler step
// ---------------------------------------------------------------------------

/// Advance `state` by one fixed step.
///
/// Velocity uses the freshly computed acceleration; position uses the
/// velocity from BEFORE the update. Mass never drops below `dry_mass_floor`.
pub fn euler_step(
    state: &VehicleState,
    geometry: &Geometry,
    forces: &ForceAccumulator<'_>,
    dt: f64,
    dry_mass_floor: f64,
) -> VehicleState {
    let f = forces.evaluate(state, geometry);

    VehicleState {
        time: state.time + dt,
        pos: state.pos + state.vel * dt,
        vel: state.vel + f.accel * dt,
        accel: f.accel,
        mass: (state.mass - f.fuel_flow * dt).max(dry_mass_floor),
        air_density: f.air_density,
        thrust: f.thrust,
        fuel_flow: f.fuel_flow,
    }
}
