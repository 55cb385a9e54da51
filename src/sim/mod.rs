pub mod event;
pub mod integrator;
pub mod runner;
pub mod sweep;
pub mod trajectory;

pub use integrator::euler_step;
pub use runner::{simulate, simulate_with, Integrator, Phase};
pub use sweep::{sweep_angle, sweep_velocity, sweep_with, SweepError, SweepRun};
pub use trajectory::Trajectory;
