use std::ops::Index;

use crate::dynamics::state::VehicleState;

/// Ordered, append-only record of a run. Index 0 is the initial condition.
///
/// Fully materialized so reporting, export and plotting can each read it as
/// often as they like.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    dt: f64,
    states: Vec<VehicleState>,
}

impl Trajectory {
    pub(crate) fn with_capacity(dt: f64, capacity: usize) -> Self {
        Self {
            dt,
            states: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, state: VehicleState) {
        self.states.push(state);
    }

    /// Time step the run used, s.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&VehicleState> {
        self.states.get(index)
    }

    pub fn first(&self) -> Option<&VehicleState> {
        self.states.first()
    }

    pub fn last(&self) -> Option<&VehicleState> {
        self.states.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VehicleState> {
        self.states.iter()
    }

    pub fn states(&self) -> &[VehicleState] {
        &self.states
    }

    pub fn times(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.time).collect()
    }

    pub fn thrust_series(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.thrust).collect()
    }

    pub fn fuel_flow_series(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.fuel_flow).collect()
    }

    /// Fuel burned during each step (kg), one entry per record after the first.
    ///
    /// Taken from the mass drop so the dry-mass clamp is respected.
    pub fn fuel_burned_per_step(&self) -> Vec<f64> {
        self.states
            .windows(2)
            .map(|w| w[0].mass - w[1].mass)
            .collect()
    }

    /// Running total of fuel burned, aligned with the records (starts at 0).
    pub fn cumulative_fuel(&self) -> Vec<f64> {
        let initial = match self.states.first() {
            Some(s) => s.mass,
            None => return Vec::new(),
        };
        self.states.iter().map(|s| initial - s.mass).collect()
    }

    /// Index of the first record with a NaN or infinite channel.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.states.iter().position(|s| !s.is_finite())
    }
}

impl Index<usize> for Trajectory {
    type Output = VehicleState;

    fn index(&self, index: usize) -> &VehicleState {
        &self.states[index]
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a VehicleState;
    type IntoIter = std::slice::Iter<'a, VehicleState>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    fn record(time: f64, mass: f64, thrust: f64) -> VehicleState {
        VehicleState {
            time,
            pos: Vector2::zeros(),
            vel: Vector2::new(150.0, 0.0),
            accel: Vector2::zeros(),
            mass,
            air_density: 1.225,
            thrust,
            fuel_flow: 0.0,
        }
    }

    fn sample() -> Trajectory {
        let mut t = Trajectory::with_capacity(0.5, 3);
        t.push(record(0.0, 500.0, 10.0));
        t.push(record(0.5, 499.0, 12.0));
        t.push(record(1.0, 497.5, 14.0));
        t
    }

    #[test]
    fn series_are_aligned() {
        let t = sample();
        assert_eq!(t.len(), 3);
        assert_eq!(t.times(), vec![0.0, 0.5, 1.0]);
        assert_eq!(t.thrust_series(), vec![10.0, 12.0, 14.0]);
        assert_eq!(t.fuel_burned_per_step(), vec![1.0, 1.5]);
        assert_eq!(t.cumulative_fuel(), vec![0.0, 1.0, 2.5]);
        assert_eq!(t[1].mass, 499.0);
        assert_eq!(t.dt(), 0.5);
    }

    #[test]
    fn reports_first_non_finite_record() {
        let mut t = sample();
        assert_eq!(t.first_non_finite(), None);
        let mut bad = record(1.5, 497.0, 0.0);
        bad.vel.x = f64::INFINITY;
        t.push(bad);
        assert_eq!(t.first_non_finite(), Some(3));
    }

    #[test]
    fn can_be_read_repeatedly() {
        let t = sample();
        let a: f64 = t.iter().map(|s| s.thrust).sum();
        let b: f64 = (&t).into_iter().map(|s| s.thrust).sum();
        assert_eq!(a, b);
    }
}
