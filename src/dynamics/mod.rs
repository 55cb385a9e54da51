pub mod forces;
pub mod state;

pub use forces::{ForceAccumulator, ForceSample};
pub use state::{Geometry, VehicleState};
