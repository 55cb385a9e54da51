pub mod config;
pub mod dynamics;
pub mod io;
pub mod physics;
pub mod sim;
pub mod vehicle;

pub use config::{load_config, RunFile, SimConfig, Termination};
pub use dynamics::state::{Geometry, VehicleState};
pub use physics::{AtmosphereTable, DragModel, GravityModel, PropulsionKind, ThrustModel};
pub use sim::{simulate, simulate_with, Integrator, Phase, Trajectory};
pub use vehicle::{LaunchError, LaunchParams, ValidatedLaunch};
