use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::sim::trajectory::Trajectory;

/// Write trajectory data to CSV format, one row per record.
///
/// Columns: step, time, pos_x, pos_y, vel_x, vel_y, accel_x, accel_y,
///          mass, air_density, thrust, fuel_flow
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &Trajectory) -> io::Result<()> {
    writeln!(
        writer,
        "step,time,pos_x,pos_y,vel_x,vel_y,accel_x,accel_y,\
         mass,air_density,thrust,fuel_flow"
    )?;

    for (i, s) in trajectory.iter().enumerate() {
        writeln!(
            writer,
            "{},{:.4},{:.4},{:.4},{:.4},{:.4},{:.6},{:.6},\
             {:.4},{:.6},{:.4},{:.8}",
            i,
            s.time,
            s.pos.x, s.pos.y,
            s.vel.x, s.vel.y,
            s.accel.x, s.accel.y,
            s.mass,
            s.air_density,
            s.thrust,
            s.fuel_flow,
        )?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file<P: AsRef<Path>>(path: P, trajectory: &Trajectory) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_trajectory(&mut file, trajectory)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SimConfig, Termination};
    use crate::physics::atmosphere::AtmosphereTable;
    use crate::sim::simulate;
    use crate::vehicle::presets;

    fn short_run() -> Trajectory {
        let config = SimConfig {
            termination: Termination::Steps(2),
            ..SimConfig::default()
        };
        let launch = presets::demonstrator().validate(config.dry_mass_floor).unwrap();
        simulate(&launch, &config, &AtmosphereTable::standard()).unwrap()
    }

    #[test]
    fn csv_output_has_header_and_rows() {
        let mut buf = Vec::new();
        write_trajectory(&mut buf, &short_run()).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("step,time,"));
        assert_eq!(lines[0].split(',').count(), 12);
        assert_eq!(lines.len(), 4); // header + 3 records
        assert!(lines[1].starts_with("0,0.0000,0.0000,0.0000,"));
        assert!(lines[3].starts_with("2,0.0200,"));
        assert!(lines.iter().all(|l| l.split(',').count() == 12));
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trajectory.csv");
        write_trajectory_file(&path, &short_run()).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 4);
    }
}
