use rayon::prelude::*;
use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, SimConfig};
use crate::physics::atmosphere::AtmosphereTable;
use crate::vehicle::{LaunchError, LaunchParams};

use super::runner::simulate;
use super::trajectory::Trajectory;

// ---------------------------------------------------------------------------
// Parallel parameter sweeps
// ---------------------------------------------------------------------------

/// One member of a sweep: the swept value and its trajectory.
#[derive(Debug, Clone)]
pub struct SweepRun {
    pub value: f64,
    pub trajectory: Trajectory,
}

#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("sweep member {value}: {source}")]
    Launch { value: f64, source: LaunchError },
}

/// Inclusive range `start, start + step, ...` up to `stop`.
pub fn inclusive_range(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || stop < start {
        return vec![start];
    }
    let n = ((stop - start) / step + 1e-9).floor() as usize;
    (0..=n).map(|i| start + i as f64 * step).collect()
}

/// Run one simulation per value, in parallel.
///
/// `apply` derives each member's launch parameters from `base`. The config
/// and all members are validated before any run starts; results keep the
/// order of `values`.
pub fn sweep_with<F>(
    base: &LaunchParams,
    values: &[f64],
    apply: F,
    config: &SimConfig,
    atmosphere: &AtmosphereTable,
) -> Result<Vec<SweepRun>, SweepError>
where
    F: Fn(LaunchParams, f64) -> LaunchParams,
{
    config.validate()?;
    let launches = values
        .iter()
        .map(|&value| {
            apply(*base, value)
                .validate(config.dry_mass_floor)
                .map(|l| (value, l))
                .map_err(|source| SweepError::Launch { value, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let runs = launches
        .par_iter()
        .map(|(value, launch)| -> Result<SweepRun, SweepError> {
            Ok(SweepRun {
                value: *value,
                trajectory: simulate(launch, config, atmosphere)?,
            })
        })
        .collect::<Result<Vec<_>, SweepError>>()?;

    info!(runs = runs.len(), steps = config.step_count(), "sweep finished");
    Ok(runs)
}

/// Sweep the angle of attack (deg).
pub fn sweep_angle(
    base: &LaunchParams,
    angles_deg: &[f64],
    config: &SimConfig,
    atmosphere: &AtmosphereTable,
) -> Result<Vec<SweepRun>, SweepError> {
    sweep_with(
        base,
        angles_deg,
        |p, a| LaunchParams { angle_of_attack_deg: a, ..p },
        config,
        atmosphere,
    )
}

/// Sweep the initial velocity magnitude (m/s).
pub fn sweep_velocity(
    base: &LaunchParams,
    velocities: &[f64],
    config: &SimConfig,
    atmosphere: &AtmosphereTable,
) -> Result<Vec<SweepRun>, SweepError> {
    sweep_with(
        base,
        velocities,
        |p, v| LaunchParams { velocity: v, ..p },
        config,
        atmosphere,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Termination;
    use crate::vehicle::presets;

    #[test]
    fn inclusive_range_hits_endpoint() {
        assert_eq!(
            inclusive_range(0.0, 90.0, 10.0),
            vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0]
        );
        assert_eq!(inclusive_range(5.0, 5.0, 1.0), vec![5.0]);
        assert_eq!(inclusive_range(5.0, 1.0, 1.0), vec![5.0]);
    }

    #[test]
    fn sweep_preserves_order_and_matches_serial_runs() {
        let atm = AtmosphereTable::standard();
        let config = SimConfig {
            termination: Termination::Steps(50),
            ..SimConfig::default()
        };
        let base = presets::demonstrator();
        let runs = sweep_velocity(&base, &[120.0, 180.0, 240.0], &config, &atm).unwrap();

        assert_eq!(runs.iter().map(|r| r.value).collect::<Vec<_>>(), vec![120.0, 180.0, 240.0]);
        let serial = simulate(
            &LaunchParams { velocity: 180.0, ..base }.validate(200.0).unwrap(),
            &config,
            &atm,
        )
        .unwrap();
        assert_eq!(runs[1].trajectory, serial);
    }

    #[test]
    fn invalid_member_rejects_whole_sweep() {
        let atm = AtmosphereTable::standard();
        let config = SimConfig::default();
        let err = sweep_velocity(&presets::demonstrator(), &[150.0, -1.0], &config, &atm).unwrap_err();
        assert!(matches!(
            err,
            SweepError::Launch { value, source: LaunchError::NegativeVelocity(_) } if value == -1.0
        ));
    }

    #[test]
    fn invalid_config_rejects_sweep() {
        let atm = AtmosphereTable::standard();
        let config = SimConfig {
            dt: 0.0,
            termination: Termination::Elapsed(1.0),
            ..SimConfig::default()
        };
        let err = sweep_angle(&presets::demonstrator(), &[0.0, 10.0], &config, &atm).unwrap_err();
        assert!(matches!(err, SweepError::Config(ConfigError::Invalid(_))));
    }
}
