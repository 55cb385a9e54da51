use serde::{Deserialize, Serialize};

use crate::dynamics::state::{DRY_MASS_FLOOR, G0};

// ---------------------------------------------------------------------------
// Engine interface
// ---------------------------------------------------------------------------

/// Instantaneous conditions seen by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropulsionInput {
    pub air_density: f64,         // kg/m^3
    pub intake_area: f64,         // m^2
    pub horizontal_velocity: f64, // m/s, intake is axis-aligned
    pub mass: f64,                // kg
}

/// Engine response for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PropulsionOutput {
    pub thrust: f64,      // N, signed with horizontal velocity
    pub fuel_flow: f64,   // kg/s of onboard fuel
    pub oxygen_flow: f64, // kg/s ingested from the atmosphere
}

/// Thrust-generation policy.
///
/// Implementations must be pure: the force accumulator may call them any
/// number of times per step, and sweeps share one instance across threads.
pub trait ThrustModel: Send + Sync {
    fn evaluate(&self, input: &PropulsionInput) -> PropulsionOutput;

    fn name(&self) -> &'static str;
}

impl<T: ThrustModel + ?Sized> ThrustModel for &T {
    fn evaluate(&self, input: &PropulsionInput) -> PropulsionOutput {
        (**self).evaluate(input)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Empirical constants of the air-breathing engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropulsionConstants {
    /// Mass fraction of oxygen in ambient air.
    pub oxygen_fraction: f64,
    /// kg of oxygen burned per kg of fuel.
    pub oxygen_per_fuel: f64,
    /// Gravity used in the thrust conversion, m/s^2.
    pub g0: f64,
    /// Specific-impulse-like calibration multiplier. Not a physical Isp.
    pub isp_constant: f64,
}

impl Default for PropulsionConstants {
    fn default() -> Self {
        Self {
            oxygen_fraction: 0.232,
            oxygen_per_fuel: 17.2,
            g0: G0,
            isp_constant: 3200.0,
        }
    }
}

/// Which thrust policy a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropulsionKind {
    /// Oxygen-limited combustion model.
    #[default]
    AirBreathing,
    /// Legacy ram-pressure placeholder: `intake_area * rho * vx`, no fuel burn.
    Placeholder,
}

impl PropulsionKind {
    pub fn build(self, constants: PropulsionConstants, dry_mass_floor: f64) -> Box<dyn ThrustModel> {
        match self {
            PropulsionKind::AirBreathing => Box::new(AirBreathingEngine {
                constants,
                dry_mass_floor,
            }),
            PropulsionKind::Placeholder => Box::new(PlaceholderEngine { dry_mass_floor }),
        }
    }
}

// ---------------------------------------------------------------------------
// Air-breathing engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirBreathingEngine {
    pub constants: PropulsionConstants,
    pub dry_mass_floor: f64,
}

impl Default for AirBreathingEngine {
    fn default() -> Self {
        Self {
            constants: PropulsionConstants::default(),
            dry_mass_floor: DRY_MASS_FLOOR,
        }
    }
}

impl ThrustModel for AirBreathingEngine {
    fn evaluate(&self, input: &PropulsionInput) -> PropulsionOutput {
        let c = &self.constants;
        let oxygen_flow =
            c.oxygen_fraction * input.air_density * input.intake_area * input.horizontal_velocity;

        // Propellant exhausted: the engine has nothing to burn the oxygen with.
        let fuel_flow = if input.mass <= self.dry_mass_floor {
            0.0
        } else {
            oxygen_flow / c.oxygen_per_fuel
        };

        PropulsionOutput {
            thrust: fuel_flow * c.g0 * c.isp_constant,
            fuel_flow,
            oxygen_flow,
        }
    }

    fn name(&self) -> &'static str {
        "air-breathing"
    }
}

// ---------------------------------------------------------------------------
// Placeholder engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceholderEngine {
    pub dry_mass_floor: f64,
}

impl ThrustModel for PlaceholderEngine {
    fn evaluate(&self, input: &PropulsionInput) -> PropulsionOutput {
        let thrust = if input.mass <= self.dry_mass_floor {
            0.0
        } else {
            input.intake_area * input.air_density * input.horizontal_velocity
        };
        PropulsionOutput {
            thrust,
            fuel_flow: 0.0,
            oxygen_flow: 0.0,
        }
    }

    fn name(&self) -> &'static str {
        "placeholder"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
