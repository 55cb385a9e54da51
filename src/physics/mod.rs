pub mod aerodynamics;
pub mod atmosphere;
pub mod gravity;
pub mod propulsion;

pub use aerodynamics::DragModel;
pub use atmosphere::{AtmosphereError, AtmosphereTable};
pub use gravity::GravityModel;
pub use propulsion::{PropulsionConstants, PropulsionKind, ThrustModel};
