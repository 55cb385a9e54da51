pub mod launch;

pub use launch::{presets, LaunchError, LaunchParams, ValidatedLaunch};
