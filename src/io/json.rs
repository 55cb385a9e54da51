use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::config::SimConfig;
use crate::dynamics::state::EARTH_ROTATION_SPEED;
use crate::physics::{DragModel, GravityModel, PropulsionKind};
use crate::sim::event::{detect_events, ClimbOnsetDetector, EventDetector, EventKind};
use crate::sim::trajectory::Trajectory;

/// Summary statistics computed from a flight trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSummary {
    pub propulsion: PropulsionKind,
    pub gravity: GravityModel,
    pub drag: DragModel,
    pub steps: usize,
    pub flight_time_s: f64,
    pub max_altitude_m: f64,
    pub max_altitude_time_s: f64,
    pub min_altitude_m: f64,
    pub max_speed_ms: f64,
    pub final_downrange_m: f64,
    pub final_altitude_m: f64,
    pub final_speed_ms: f64,
    pub final_mass_kg: f64,
    pub fuel_burned_kg: f64,
    /// Onboard oxidizer a rocket would have carried for the same burn, t.
    pub oxidizer_saved_t: f64,
    /// Final horizontal speed plus the equatorial rotation of the Earth.
    pub inertial_horizontal_speed_ms: f64,
    /// Horizontal speed where the vehicle first started to climb.
    pub climb_onset_horizontal_speed_ms: Option<f64>,
}

impl FlightSummary {
    /// Compute summary from trajectory data. `None` for an empty trajectory.
    pub fn from_trajectory(trajectory: &Trajectory, config: &SimConfig) -> Option<Self> {
        let first = trajectory.first()?;
        let last = trajectory.last()?;

        let mut apex = first;
        let mut min_altitude = first.pos.y;
        let mut max_speed = 0.0_f64;
        for s in trajectory {
            if s.pos.y > apex.pos.y {
                apex = s;
            }
            min_altitude = min_altitude.min(s.pos.y);
            max_speed = max_speed.max(s.speed());
        }

        let fuel_burned = first.mass - last.mass;

        let mut detectors: Vec<Box<dyn EventDetector>> = vec![Box::new(ClimbOnsetDetector::new())];
        let climb_onset = detect_events(trajectory, &mut detectors)
            .into_iter()
            .find(|e| e.kind == EventKind::ClimbOnset)
            .map(|e| e.state.vel.x);

        Some(FlightSummary {
            propulsion: config.propulsion,
            gravity: config.gravity,
            drag: config.drag,
            steps: trajectory.len() - 1,
            flight_time_s: last.time,
            max_altitude_m: apex.pos.y,
            max_altitude_time_s: apex.time,
            min_altitude_m: min_altitude,
            max_speed_ms: max_speed,
            final_downrange_m: last.pos.x,
            final_altitude_m: last.pos.y,
            final_speed_ms: last.speed(),
            final_mass_kg: last.mass,
            fuel_burned_kg: fuel_burned,
            oxidizer_saved_t: config.constants.oxygen_per_fuel * fuel_burned / 1000.0,
            inertial_horizontal_speed_ms: last.vel.x + EARTH_ROTATION_SPEED,
            climb_onset_horizontal_speed_ms: climb_onset,
        })
    }
}

/// Write flight summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &FlightSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)
}

/// Write flight summary JSON to a file.
pub fn write_summary_file<P: AsRef<Path>>(path: P, summary: &FlightSummary) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_summary(&mut file, summary)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Termination;
    use crate::physics::atmosphere::AtmosphereTable;
    use crate::sim::simulate;
    use crate::vehicle::presets;
    use approx::assert_relative_eq;

    fn run(steps: usize) -> (Trajectory, SimConfig) {
        let config = SimConfig {
            termination: Termination::Steps(steps),
            ..SimConfig::default()
        };
        let launch = presets::demonstrator().validate(config.dry_mass_floor).unwrap();
        (simulate(&launch, &config, &AtmosphereTable::standard()).unwrap(), config)
    }

    #[test]
    fn summary_values() {
        let (traj, config) = run(500);
        let s = FlightSummary::from_trajectory(&traj, &config).unwrap();
        let last = traj.last().unwrap();

        assert_eq!(s.steps, 500);
        assert_relative_eq!(s.flight_time_s, 5.0, epsilon = 1e-9);
        assert_relative_eq!(s.fuel_burned_kg, 500.0 - last.mass);
        assert!(s.fuel_burned_kg > 0.0);
        assert_relative_eq!(s.oxidizer_saved_t, 17.2 * s.fuel_burned_kg / 1000.0);
        assert_relative_eq!(s.inertial_horizontal_speed_ms, last.vel.x + 460.0);
        assert!(s.max_altitude_m >= s.final_altitude_m);
        assert!(s.max_altitude_m >= 0.0);
        assert!(s.min_altitude_m <= 0.0);
        assert!(s.max_speed_ms >= s.final_speed_ms);
    }

    #[test]
    fn summary_json_has_fields() {
        let (traj, config) = run(10);
        let summary = FlightSummary::from_trajectory(&traj, &config).unwrap();

        let mut buf = Vec::new();
        write_summary(&mut buf, &summary).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["steps"], 10);
        assert_eq!(value["propulsion"], "air-breathing");
        assert_eq!(value["gravity"], "inverse-square");
        assert!(value["max_altitude_m"].is_number());
        assert!(value["oxidizer_saved_t"].is_number());
        assert!(value.get("climb_onset_horizontal_speed_ms").is_some());
    }

    #[test]
    fn writes_file() {
        let (traj, config) = run(10);
        let summary = FlightSummary::from_trajectory(&traj, &config).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_summary_file(&path, &summary).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.trim_start().starts_with('{'));
    }
}
