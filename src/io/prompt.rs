//! Interactive collection of launch parameters.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::vehicle::{LaunchParams, ValidatedLaunch};

const FIELDS: [&str; 5] = [
    "Initial mass (kg)",
    "Initial velocity (m/s, ramjets need ~100 or more)",
    "Angle of attack (deg)",
    "Frontal radius (m)",
    "Intake area (% of frontal area)",
];

/// Ask for one number until the answer parses. EOF is an error.
fn read_number<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> io::Result<f64> {
    let mut line = String::new();
    loop {
        write!(output, "{}: ", label)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("input closed while reading {}", label),
            ));
        }
        match line.trim().parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => writeln!(output, "  '{}' is not a number, try again", line.trim())?,
        }
    }
}

/// Prompt for a full parameter set, re-asking until it validates.
///
/// Prints the derived intake area once the parameters are accepted.
pub fn prompt_launch<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    dry_mass_floor: f64,
) -> io::Result<ValidatedLaunch> {
    loop {
        let mut values = [0.0; 5];
        for (value, label) in values.iter_mut().zip(FIELDS) {
            *value = read_number(input, output, label)?;
        }
        let params = LaunchParams {
            initial_mass: values[0],
            velocity: values[1],
            angle_of_attack_deg: values[2],
            radius: values[3],
            intake_area_percent: values[4],
        };

        match params.validate(dry_mass_floor) {
            Ok(launch) => {
                writeln!(output, "Intake area: {:.4} m^2", launch.geometry().intake_area)?;
                return Ok(launch);
            }
            Err(e) => {
                debug!(error = %e, "rejected launch parameters");
                writeln!(output, "  invalid parameters: {}. Please enter them again.", e)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn run(input: &str) -> (io::Result<ValidatedLaunch>, String) {
        let mut reader = input.as_bytes();
        let mut out = Vec::new();
        let result = prompt_launch(&mut reader, &mut out, 200.0);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn accepts_valid_input() {
        let (result, out) = run("500\n150\n10\n1\n50\n");
        let launch = result.unwrap();
        assert_eq!(launch.params().initial_mass, 500.0);
        assert_eq!(launch.params().angle_of_attack_deg, 10.0);
        assert_relative_eq!(launch.geometry().intake_area, 0.5 * PI, epsilon = 1e-12);
        assert!(out.contains("Intake area: 1.5708 m^2"));
    }

    #[test]
    fn reasks_on_non_numeric_field() {
        let (result, out) = run("abc\n500\n150\n10\n1\n50\n");
        assert_eq!(result.unwrap().params().initial_mass, 500.0);
        assert!(out.contains("'abc' is not a number"));
    }

    #[test]
    fn restarts_on_invalid_set() {
        // Mass at the dry floor is rejected, second set is accepted.
        let (result, out) = run("200\n150\n10\n1\n50\n600\n150\n10\n1\n50\n");
        assert_eq!(result.unwrap().params().initial_mass, 600.0);
        assert!(out.contains("invalid parameters"));
    }

    #[test]
    fn eof_is_an_error() {
        let (result, _) = run("500\n150\n");
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
    }
}
