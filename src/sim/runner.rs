use tracing::{debug, error};

use crate::config::{ConfigError, SimConfig};
use crate::dynamics::forces::ForceAccumulator;
use crate::dynamics::state::{Geometry, VehicleState};
use crate::physics::atmosphere::AtmosphereTable;
use crate::physics::propulsion::ThrustModel;
use crate::vehicle::ValidatedLaunch;

use super::integrator::euler_step;
use super::trajectory::Trajectory;

// ---------------------------------------------------------------------------
// Integrator state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Terminated,
}

/// Drives the force model over fixed steps and owns the resulting trajectory.
///
/// Each step reads the current state and replaces it with a wholly new one;
/// nothing else holds a mutable alias to it.
pub struct Integrator<'a> {
    atmosphere: &'a AtmosphereTable,
    engine: Box<dyn ThrustModel + 'a>,
    config: SimConfig,
    geometry: Geometry,
    state: VehicleState,
    trajectory: Trajectory,
    phase: Phase,
    steps_taken: usize,
    steps_total: usize,
    reported_non_finite: bool,
}

impl<'a> Integrator<'a> {
    /// Integrator using the thrust strategy selected in `config`.
    pub fn new(
        launch: &ValidatedLaunch,
        config: &SimConfig,
        atmosphere: &'a AtmosphereTable,
    ) -> Result<Self, ConfigError> {
        Self::with_engine(launch, config, atmosphere, config.thrust_model())
    }

    /// Integrator with a caller-supplied thrust strategy.
    ///
    /// Fails if `config` does not pass [`SimConfig::validate`].
    pub fn with_engine(
        launch: &ValidatedLaunch,
        config: &SimConfig,
        atmosphere: &'a AtmosphereTable,
        engine: Box<dyn ThrustModel + 'a>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let geometry = launch.geometry();
        let steps_total = config.step_count();

        let mut integrator = Self {
            atmosphere,
            engine,
            config: config.clone(),
            geometry,
            state: launch.initial_state(),
            trajectory: Trajectory::with_capacity(config.dt, steps_total.min(1_000_000) + 1),
            phase: if steps_total == 0 { Phase::Terminated } else { Phase::Running },
            steps_taken: 0,
            steps_total,
            reported_non_finite: false,
        };

        // Record 0 carries the forces evaluated at the initial condition.
        let f = integrator.accumulator().evaluate(&integrator.state, &integrator.geometry);
        integrator.state.accel = f.accel;
        integrator.state.air_density = f.air_density;
        integrator.state.thrust = f.thrust;
        integrator.state.fuel_flow = f.fuel_flow;
        integrator.trajectory.push(integrator.state.clone());

        debug!(
            engine = integrator.engine.name(),
            steps = steps_total,
            dt = config.dt,
            mass = integrator.state.mass,
            "integrator initialized"
        );
        Ok(integrator)
    }

    fn accumulator(&self) -> ForceAccumulator<'_> {
        ForceAccumulator {
            atmosphere: self.atmosphere,
            engine: self.engine.as_ref(),
            gravity: self.config.gravity,
            drag: self.config.drag,
            drag_coefficient: self.config.drag_coefficient,
        }
    }

    /// Advance one step if still running; returns the phase afterwards.
    pub fn step(&mut self) -> Phase {
        if self.phase == Phase::Terminated {
            return self.phase;
        }

        let mut next = euler_step(
            &self.state,
            &self.geometry,
            &self.accumulator(),
            self.config.dt,
            self.config.dry_mass_floor,
        );
        // Time from the step index, not a running sum.
        next.time = (self.steps_taken + 1) as f64 * self.config.dt;

        if !next.is_finite() && !self.reported_non_finite {
            error!(step = self.steps_taken + 1, time = next.time, ?next, "non-finite vehicle state");
            self.reported_non_finite = true;
        }

        self.trajectory.push(next.clone());
        self.state = next;
        self.steps_taken += 1;

        if self.steps_taken >= self.steps_total {
            self.phase = Phase::Terminated;
            debug!(
                steps = self.steps_taken,
                time = self.state.time,
                altitude = self.state.pos.y,
                downrange = self.state.pos.x,
                mass = self.state.mass,
                "integration finished"
            );
        }
        self.phase
    }

    /// Run to termination and hand over the trajectory.
    pub fn run(mut self) -> Trajectory {
        while self.step() == Phase::Running {}
        self.trajectory
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Stop early and keep what has been integrated so far.
    pub fn into_trajectory(self) -> Trajectory {
        self.trajectory
    }
}

// ---------------------------------------------------------------------------
// Convenience wrappers
// ---------------------------------------------------------------------------

/// Simulate a run with the configured thrust strategy.
pub fn simulate(
    launch: &ValidatedLaunch,
    config: &SimConfig,
    atmosphere: &AtmosphereTable,
) -> Result<Trajectory, ConfigError> {
    Ok(Integrator::new(launch, config, atmosphere)?.run())
}

/// Simulate a run with a custom thrust strategy.
pub fn simulate_with(
    launch: &ValidatedLaunch,
    config: &SimConfig,
    atmosphere: &AtmosphereTable,
    engine: &dyn ThrustModel,
) -> Result<Trajectory, ConfigError> {
    Ok(Integrator::with_engine(launch, config, atmosphere, Box::new(engine))?.run())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Termination;
    use crate::physics::propulsion::{PropulsionInput, PropulsionOutput};
    use crate::vehicle::presets;

    fn config(steps: usize) -> SimConfig {
        SimConfig {
            termination: Termination::Steps(steps),
            ..SimConfig::default()
        }
    }

    #[test]
    fn state_machine_terminates_after_budget() {
        let atm = AtmosphereTable::standard();
        let launch = presets::demonstrator().validate(200.0).unwrap();
        let mut integ = Integrator::new(&launch, &config(3), &atm).unwrap();

        assert_eq!(integ.phase(), Phase::Running);
        assert_eq!(integ.step(), Phase::Running);
        assert_eq!(integ.step(), Phase::Running);
        assert_eq!(integ.step(), Phase::Terminated);
        // Further steps are no-ops
        assert_eq!(integ.step(), Phase::Terminated);
        assert_eq!(integ.steps_taken(), 3);
        assert_eq!(integ.trajectory().len(), 4);
    }

    #[test]
    fn first_record_holds_initial_forces() {
        let atm = AtmosphereTable::standard();
        let launch = presets::demonstrator().validate(200.0).unwrap();
        let traj = simulate(&launch, &config(1), &atm).unwrap();

        assert_eq!(traj[0].air_density, 1.225);
        assert!(traj[0].thrust > 0.0);
        // Step 1 applied exactly the forces recorded at step 0
        assert_eq!(traj[1].accel, traj[0].accel);
        assert_eq!(traj[1].fuel_flow, traj[0].fuel_flow);
    }

    #[test]
    fn elapsed_budget_matches_step_count() {
        let atm = AtmosphereTable::standard();
        let launch = presets::demonstrator().validate(200.0).unwrap();
        let cfg = SimConfig {
            dt: 0.05,
            termination: Termination::Elapsed(2.0),
            ..SimConfig::default()
        };
        let traj = simulate(&launch, &cfg, &atm).unwrap();
        assert_eq!(traj.len(), 41);
        assert_eq!(traj.last().unwrap().time, 2.0);
    }

    #[test]
    fn record_time_does_not_drift() {
        let atm = AtmosphereTable::standard();
        let launch = presets::demonstrator().validate(200.0).unwrap();
        let traj = simulate(&launch, &SimConfig::default(), &atm).unwrap();
        assert_eq!(traj.len(), 10_001);
        assert_eq!(traj.last().unwrap().time, 100.0);
        assert_eq!(traj[5_000].time, 50.0);
    }

    #[test]
    fn rejects_unvalidated_config() {
        let atm = AtmosphereTable::standard();
        let launch = presets::demonstrator().validate(200.0).unwrap();
        let cfg = SimConfig {
            dt: 0.0,
            termination: Termination::Elapsed(1.0),
            ..SimConfig::default()
        };
        assert!(matches!(simulate(&launch, &cfg, &atm), Err(ConfigError::Invalid(_))));

        let cfg = SimConfig { dt: f64::NAN, ..SimConfig::default() };
        assert!(matches!(
            simulate_with(&launch, &cfg, &atm, &FixedThrust),
            Err(ConfigError::Invalid(_))
        ));
        assert!(Integrator::new(&launch, &SimConfig { dt: -0.01, ..SimConfig::default() }, &atm).is_err());
    }

    struct FixedThrust;

    impl ThrustModel for FixedThrust {
        fn evaluate(&self, _input: &PropulsionInput) -> PropulsionOutput {
            PropulsionOutput {
                thrust: 50_000.0,
                fuel_flow: 1.0,
                oxygen_flow: 0.0,
            }
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    #[test]
    fn custom_strategy_is_used() {
        let atm = AtmosphereTable::standard();
        let launch = presets::demonstrator().validate(200.0).unwrap();
        let traj = simulate_with(&launch, &config(10), &atm, &FixedThrust).unwrap();
        assert!(traj.iter().all(|s| s.thrust == 50_000.0));
        let burned = traj[0].mass - traj.last().unwrap().mass;
        assert!((burned - 10.0 * 0.01).abs() < 1e-9);
    }
}
