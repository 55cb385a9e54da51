use crate::dynamics::state::VehicleState;

use super::trajectory::Trajectory;

// ---------------------------------------------------------------------------
// Flight events (found after the run, never used to stop it)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Mass reached the dry floor; the engine is out of fuel.
    Burnout,
    /// Vertical velocity turned from positive to non-positive.
    Apogee,
    /// Vertical velocity turned positive after sinking or flying level.
    ClimbOnset,
    /// Altitude crossed a threshold.
    Altitude { altitude: f64, ascending: bool },
}

#[derive(Debug, Clone)]
pub struct SimEvent {
    pub step: usize,
    pub time: f64,
    pub kind: EventKind,
    pub state: VehicleState,
}

/// Passive detector: inspects consecutive records and reports events.
pub trait EventDetector {
    fn check(&mut self, prev: &VehicleState, current: &VehicleState) -> Option<EventKind>;
}

pub struct ApogeeDetector;

impl EventDetector for ApogeeDetector {
    fn check(&mut self, prev: &VehicleState, current: &VehicleState) -> Option<EventKind> {
        if prev.vel.y > 0.0 && current.vel.y <= 0.0 {
            Some(EventKind::Apogee)
        } else {
            None
        }
    }
}

/// Fires on the first sign change of vertical velocity to positive. The
/// horizontal speed there is the lowest release speed that still climbs.
pub struct ClimbOnsetDetector {
    fired: bool,
}

impl ClimbOnsetDetector {
    pub fn new() -> Self {
        Self { fired: false }
    }
}

impl Default for ClimbOnsetDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl EventDetector for ClimbOnsetDetector {
    fn check(&mut self, prev: &VehicleState, current: &VehicleState) -> Option<EventKind> {
        if !self.fired && prev.vel.y <= 0.0 && current.vel.y > 0.0 {
            self.fired = true;
            Some(EventKind::ClimbOnset)
        } else {
            None
        }
    }
}

pub struct BurnoutDetector {
    pub dry_mass_floor: f64,
    fired: bool,
}

impl BurnoutDetector {
    pub fn new(dry_mass_floor: f64) -> Self {
        Self { dry_mass_floor, fired: false }
    }
}

impl EventDetector for BurnoutDetector {
    fn check(&mut self, prev: &VehicleState, current: &VehicleState) -> Option<EventKind> {
        if !self.fired && prev.mass > self.dry_mass_floor && current.mass <= self.dry_mass_floor {
            self.fired = true;
            Some(EventKind::Burnout)
        } else {
            None
        }
    }
}

/// Detects when altitude crosses a threshold (ascending or descending).
pub struct AltitudeDetector {
    pub altitude: f64,
    pub ascending: bool,
    fired: bool,
}

impl AltitudeDetector {
    pub fn new(altitude: f64, ascending: bool) -> Self {
        Self { altitude, ascending, fired: false }
    }
}

impl EventDetector for AltitudeDetector {
    fn check(&mut self, prev: &VehicleState, current: &VehicleState) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        let crossed = if self.ascending {
            prev.pos.y < self.altitude && current.pos.y >= self.altitude
        } else {
            prev.pos.y > self.altitude && current.pos.y <= self.altitude
        };
        if crossed {
            self.fired = true;
            Some(EventKind::Altitude {
                altitude: self.altitude,
                ascending: self.ascending,
            })
        } else {
            None
        }
    }
}

/// Detectors used by the report: burnout, apogee, climb onset, ground contact.
pub fn default_detectors(dry_mass_floor: f64) -> Vec<Box<dyn EventDetector>> {
    vec![
        Box::new(BurnoutDetector::new(dry_mass_floor)),
        Box::new(ApogeeDetector),
        Box::new(ClimbOnsetDetector::new()),
        Box::new(AltitudeDetector::new(0.0, false)),
    ]
}

/// Run every detector over consecutive record pairs, in time order.
pub fn detect_events(trajectory: &Trajectory, detectors: &mut [Box<dyn EventDetector>]) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for (i, pair) in trajectory.states().windows(2).enumerate() {
        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(&pair[0], &pair[1]) {
                events.push(SimEvent {
                    step: i + 1,
                    time: pair[1].time,
                    kind,
                    state: pair[1].clone(),
                });
            }
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    fn make_state(alt: f64, vy: f64, mass: f64) -> VehicleState {
        VehicleState {
            time: 0.0,
            pos: Vector2::new(0.0, alt),
            vel: Vector2::new(150.0, vy),
            accel: Vector2::zeros(),
            mass,
            air_density: 1.0,
            thrust: 0.0,
            fuel_flow: 0.0,
        }
    }

    #[test]
    fn apogee_detected() {
        let mut det = ApogeeDetector;
        let prev = make_state(5000.0, 10.0, 300.0);
        let curr = make_state(5005.0, -1.0, 300.0);
        assert_eq!(det.check(&prev, &curr), Some(EventKind::Apogee));
    }

    #[test]
    fn climb_onset_fires_once() {
        let mut det = ClimbOnsetDetector::new();
        let prev = make_state(-20.0, -0.5, 300.0);
        let curr = make_state(-20.1, 0.3, 300.0);
        assert_eq!(det.check(&prev, &curr), Some(EventKind::ClimbOnset));
        assert!(det.check(&prev, &curr).is_none());
    }

    #[test]
    fn burnout_detected_at_floor() {
        let mut det = BurnoutDetector::new(200.0);
        let prev = make_state(100.0, 5.0, 200.4);
        let curr = make_state(100.0, 5.0, 200.0);
        assert_eq!(det.check(&prev, &curr), Some(EventKind::Burnout));
        assert!(det.check(&curr, &curr).is_none());
    }

    #[test]
    fn altitude_detector_descending() {
        let mut det = AltitudeDetector::new(0.0, false);
        let prev = make_state(3.0, -10.0, 300.0);
        let curr = make_state(-1.0, -10.0, 300.0);
        assert!(det.check(&prev, &curr).is_some());
        // Should not fire again
        assert!(det.check(&prev, &curr).is_none());
    }
}
