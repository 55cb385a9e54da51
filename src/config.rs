//! Run configuration and its TOML loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::dynamics::state::DRY_MASS_FLOOR;
use crate::physics::aerodynamics::DragModel;
use crate::physics::gravity::GravityModel;
use crate::physics::propulsion::{PropulsionConstants, PropulsionKind, ThrustModel};
use crate::vehicle::LaunchParams;

/// When the integrator stops. There is no event-driven early exit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    /// Fixed number of Euler steps.
    Steps(usize),
    /// Fixed simulated duration, s.
    Elapsed(f64),
}

/// Integrator and model settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub dt: f64,
    pub termination: Termination,
    pub dry_mass_floor: f64,
    pub drag_coefficient: f64,
    pub gravity: GravityModel,
    pub drag: DragModel,
    pub propulsion: PropulsionKind,
    pub constants: PropulsionConstants,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            termination: Termination::Elapsed(100.0),
            dry_mass_floor: DRY_MASS_FLOOR,
            drag_coefficient: 0.025,
            gravity: GravityModel::default(),
            drag: DragModel::default(),
            propulsion: PropulsionKind::default(),
            constants: PropulsionConstants::default(),
        }
    }
}

impl SimConfig {
    /// Number of Euler steps implied by the termination rule.
    pub fn step_count(&self) -> usize {
        match self.termination {
            Termination::Steps(n) => n,
            // Small bias keeps 100 / 0.01 from rounding up to 10001.
            Termination::Elapsed(t_max) => ((t_max / self.dt) - 1e-9).ceil().max(0.0) as usize,
        }
    }

    pub fn thrust_model(&self) -> Box<dyn ThrustModel> {
        self.propulsion.build(self.constants, self.dry_mass_floor)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::Invalid(format!("dt must be positive, got {}", self.dt)));
        }
        match self.termination {
            Termination::Steps(0) => {
                return Err(ConfigError::Invalid("step count must be at least 1".into()));
            }
            Termination::Elapsed(t) if !(t.is_finite() && t > 0.0) => {
                return Err(ConfigError::Invalid(format!(
                    "elapsed-time budget must be positive, got {}",
                    t
                )));
            }
            _ => {}
        }
        if !(self.dry_mass_floor.is_finite() && self.dry_mass_floor > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "dry mass floor must be positive, got {}",
                self.dry_mass_floor
            )));
        }
        if !(self.drag_coefficient.is_finite() && self.drag_coefficient >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "drag coefficient must be non-negative, got {}",
                self.drag_coefficient
            )));
        }
        let c = &self.constants;
        if !(c.oxygen_per_fuel.is_finite() && c.oxygen_per_fuel > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "oxygen-per-fuel ratio must be positive, got {}",
                c.oxygen_per_fuel
            )));
        }
        if !(c.oxygen_fraction.is_finite() && (0.0..=1.0).contains(&c.oxygen_fraction)) {
            return Err(ConfigError::Invalid(format!(
                "oxygen fraction must lie in [0, 1], got {}",
                c.oxygen_fraction
            )));
        }
        for (name, value) in [("g0", c.g0), ("isp_constant", c.isp_constant)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, value)));
            }
        }
        Ok(())
    }
}

/// Contents of a run file: model settings plus optional launch parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunFile {
    #[serde(default)]
    pub sim: SimConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch: Option<LaunchParams>,
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to write TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Parse a run file from TOML text.
pub fn parse_config(contents: &str) -> Result<RunFile, ConfigError> {
    let run: RunFile = toml::from_str(contents)?;
    run.sim.validate()?;
    Ok(run)
}

/// Load and validate a run file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RunFile, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let run = parse_config(&contents)?;
    info!(path = %path.display(), steps = run.sim.step_count(), "loaded run configuration");
    Ok(run)
}

/// Render a run file back to TOML (used by `--dump-config`).
pub fn to_toml(run: &RunFile) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(run)?)
}
