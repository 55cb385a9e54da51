use thiserror::Error;

// ---------------------------------------------------------------------------
// Reference density table (-1 km to 90 km)
// ---------------------------------------------------------------------------

/// Reference altitude/density breakpoints, altitude in m, density in kg/m^3.
const STANDARD_BREAKPOINTS: [(f64, f64); 22] = [
    (-1_000.0, 1.347),
    (0.0, 1.225),
    (1_000.0, 1.112),
    (2_000.0, 1.007),
    (3_000.0, 0.9093),
    (4_000.0, 0.8194),
    (5_000.0, 0.7364),
    (6_000.0, 0.6601),
    (7_000.0, 0.5900),
    (8_000.0, 0.5258),
    (9_000.0, 0.4671),
    (10_000.0, 0.4135),
    (15_000.0, 0.1948),
    (20_000.0, 0.08891),
    (25_000.0, 0.04008),
    (30_000.0, 0.01841),
    (40_000.0, 0.003996),
    (50_000.0, 0.001027),
    (60_000.0, 0.000_309_7),
    (70_000.0, 0.000_082_83),
    (80_000.0, 0.000_018_46),
    (90_000.0, 0.0),
];

/// Errors raised when building a table from caller-supplied breakpoints.
#[derive(Debug, Error, PartialEq)]
pub enum AtmosphereError {
    #[error("atmosphere table needs at least 2 breakpoints, got {0}")]
    TooFewBreakpoints(usize),
    #[error("altitude {altitude} m at index {index} is not strictly above the previous breakpoint")]
    NotIncreasing { index: usize, altitude: f64 },
    #[error("density {density} kg/m^3 at index {index} must be finite and non-negative")]
    InvalidDensity { index: usize, density: f64 },
    #[error("altitude at index {0} is not finite")]
    NonFiniteAltitude(usize),
}

/// Immutable piecewise-linear density model.
///
/// Built once and shared by reference between runs; nothing mutates it after
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct AtmosphereTable {
    altitudes: Vec<f64>,
    densities: Vec<f64>,
}

impl AtmosphereTable {
    /// Build a table from `(altitude, density)` pairs.
    pub fn new(breakpoints: &[(f64, f64)]) -> Result<Self, AtmosphereError> {
        if breakpoints.len() < 2 {
            return Err(AtmosphereError::TooFewBreakpoints(breakpoints.len()));
        }

        for (index, &(altitude, density)) in breakpoints.iter().enumerate() {
            if !altitude.is_finite() {
                return Err(AtmosphereError::NonFiniteAltitude(index));
            }
            if !density.is_finite() || density < 0.0 {
                return Err(AtmosphereError::InvalidDensity { index, density });
            }
            if index > 0 && altitude <= breakpoints[index - 1].0 {
                return Err(AtmosphereError::NotIncreasing { index, altitude });
            }
        }

        Ok(Self {
            altitudes: breakpoints.iter().map(|&(h, _)| h).collect(),
            densities: breakpoints.iter().map(|&(_, rho)| rho).collect(),
        })
    }

    /// The reference table: 1.347 kg/m^3 at -1 km down to vacuum at 90 km.
    pub fn standard() -> Self {
        Self {
            altitudes: STANDARD_BREAKPOINTS.iter().map(|&(h, _)| h).collect(),
            densities: STANDARD_BREAKPOINTS.iter().map(|&(_, rho)| rho).collect(),
        }
    }

    /// Air density at `altitude` (m).
    ///
    /// Linear between breakpoints; outside the table the nearest endpoint
    /// density is returned unchanged.
    pub fn density(&self, altitude: f64) -> f64 {
        let last = self.altitudes.len() - 1;
        if altitude.is_nan() {
            return f64::NAN;
        }
        if altitude <= self.altitudes[0] {
            return self.densities[0];
        }
        if altitude >= self.altitudes[last] {
            return self.densities[last];
        }

        // First breakpoint strictly above the query altitude.
        let upper = self.altitudes.partition_point(|&h| h <= altitude);
        let lower = upper - 1;

        let (h0, h1) = (self.altitudes[lower], self.altitudes[upper]);
        let (r0, r1) = (self.densities[lower], self.densities[upper]);
        let frac = (altitude - h0) / (h1 - h0);
        (r0 + frac * (r1 - r0)).max(0.0)
    }

    /// Lowest and highest tabulated altitude.
    pub fn altitude_range(&self) -> (f64, f64) {
        (self.altitudes[0], self.altitudes[self.altitudes.len() - 1])
    }

    pub fn breakpoints(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.altitudes.iter().copied().zip(self.densities.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.altitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.altitudes.is_empty()
    }
}

impl Default for AtmosphereTable {
    fn default() -> Self {
        Self::standard()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_endpoints_and_sea_level() {
        let atm = AtmosphereTable::standard();
        assert_eq!(atm.density(-1_000.0), 1.347);
        assert_eq!(atm.density(0.0), 1.225);
        assert_eq!(atm.density(90_000.0), 0.0);
    }

    #[test]
    fn density_monotonically_non_increasing() {
        let atm = AtmosphereTable::standard();
        let points: Vec<(f64, f64)> = atm.breakpoints().collect();
        for pair in points.windows(2) {
            assert!(pair[1].1 <= pair[0].1, "density rose between {:?} and {:?}", pair[0], pair[1]);
        }

        let mut prev = atm.density(-1_500.0);
        let mut h = -1_500.0;
        while h <= 95_000.0 {
            let rho = atm.density(h);
            assert!(rho <= prev);
            prev = rho;
            h += 250.0;
        }
    }

    #[test]
    fn clamps_outside_table() {
        let atm = AtmosphereTable::standard();
        assert_eq!(atm.density(-5_000.0), 1.347);
        assert_eq!(atm.density(150_000.0), 0.0);
        assert_eq!(atm.density(f64::INFINITY), 0.0);
        assert_eq!(atm.density(f64::NEG_INFINITY), 1.347);
    }

    #[test]
    fn interpolates_between_breakpoints() {
        let atm = AtmosphereTable::standard();
        let rho = atm.density(500.0);
        assert!((rho - (1.225 + 1.112) / 2.0).abs() < 1e-12);

        let rho = atm.density(12_500.0);
        assert!((rho - (0.4135 + 0.1948) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn never_negative_near_top() {
        let atm = AtmosphereTable::standard();
        for h in [80_000.0, 85_000.0, 89_999.0, 89_999.999] {
            assert!(atm.density(h) >= 0.0);
        }
    }

    #[test]
    fn synthetic_table() {
        let atm = AtmosphereTable::new(&[(0.0, 2.0), (100.0, 0.0)]).unwrap();
        assert!((atm.density(25.0) - 1.5).abs() < 1e-12);
        assert_eq!(atm.len(), 2);
        assert_eq!(atm.altitude_range(), (0.0, 100.0));
    }

    #[test]
    fn rejects_bad_tables() {
        assert_eq!(
            AtmosphereTable::new(&[(0.0, 1.0)]),
            Err(AtmosphereError::TooFewBreakpoints(1))
        );
        assert!(matches!(
            AtmosphereTable::new(&[(0.0, 1.0), (0.0, 0.5)]),
            Err(AtmosphereError::NotIncreasing { index: 1, .. })
        ));
        assert!(matches!(
            AtmosphereTable::new(&[(0.0, 1.0), (10.0, -0.1)]),
            Err(AtmosphereError::InvalidDensity { index: 1, .. })
        ));
        assert_eq!(
            AtmosphereTable::new(&[(f64::NAN, 1.0), (10.0, 0.1)]),
            Err(AtmosphereError::NonFiniteAltitude(0))
        );
    }
}
