use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ramjet_sim::config::{self, RunFile, SimConfig, Termination};
use ramjet_sim::dynamics::state::EARTH_ROTATION_SPEED;
use ramjet_sim::io::{csv, json, prompt};
use ramjet_sim::physics::{AtmosphereTable, DragModel, GravityModel, PropulsionKind};
use ramjet_sim::sim::event::{default_detectors, detect_events, EventKind};
use ramjet_sim::sim::{self, sweep, Trajectory};
use ramjet_sim::vehicle::{presets, LaunchParams, ValidatedLaunch};

#[derive(Parser, Debug)]
#[command(name = "ramjet-sim")]
#[command(about = "2D powered-climb simulator for an air-breathing vehicle")]
#[command(version)]
struct Cli {
    /// TOML run file with a [sim] table and an optional [launch] table
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ask for the launch parameters on stdin
    #[arg(short, long)]
    interactive: bool,

    /// Initial mass (kg)
    #[arg(long)]
    mass: Option<f64>,

    /// Initial velocity (m/s)
    #[arg(long)]
    velocity: Option<f64>,

    /// Angle of attack (deg)
    #[arg(long)]
    angle: Option<f64>,

    /// Frontal radius (m)
    #[arg(long)]
    radius: Option<f64>,

    /// Intake area (% of frontal area)
    #[arg(long)]
    intake: Option<f64>,

    #[arg(long, value_enum)]
    gravity: Option<GravityArg>,

    #[arg(long, value_enum)]
    drag: Option<DragArg>,

    #[arg(long, value_enum)]
    propulsion: Option<PropulsionArg>,

    /// Time step (s)
    #[arg(long)]
    dt: Option<f64>,

    /// Number of steps to integrate
    #[arg(long, conflicts_with = "t_max")]
    steps: Option<usize>,

    /// Simulated duration (s)
    #[arg(long)]
    t_max: Option<f64>,

    /// Write the trajectory as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the flight summary as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Sweep the angle of attack instead of a single run: START STOP STEP (deg)
    #[arg(long, num_args = 3, value_names = ["START", "STOP", "STEP"], allow_negative_numbers = true)]
    sweep_angles: Option<Vec<f64>>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GravityArg {
    Constant,
    InverseSquare,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DragArg {
    Vector,
    PerAxis,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PropulsionArg {
    AirBreathing,
    Placeholder,
}

impl From<GravityArg> for GravityModel {
    fn from(arg: GravityArg) -> Self {
        match arg {
            GravityArg::Constant => GravityModel::Constant,
            GravityArg::InverseSquare => GravityModel::InverseSquare,
        }
    }
}

impl From<DragArg> for DragModel {
    fn from(arg: DragArg) -> Self {
        match arg {
            DragArg::Vector => DragModel::Vector,
            DragArg::PerAxis => DragModel::PerAxis,
        }
    }
}

impl From<PropulsionArg> for PropulsionKind {
    fn from(arg: PropulsionArg) -> Self {
        match arg {
            PropulsionArg::AirBreathing => PropulsionKind::AirBreathing,
            PropulsionArg::Placeholder => PropulsionKind::Placeholder,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut run = match &cli.config {
        Some(path) => config::load_config(path)
            .with_context(|| format!("loading run file {}", path.display()))?,
        None => RunFile::default(),
    };
    apply_overrides(&cli, &mut run);
    run.sim.validate().context("invalid simulation settings")?;

    if cli.dump_config {
        print!("{}", config::to_toml(&run)?);
        return Ok(());
    }

    let atmosphere = AtmosphereTable::standard();

    if let Some(range) = &cli.sweep_angles {
        let base = run.launch.unwrap_or_else(presets::demonstrator);
        return run_sweep(&base, range, &run.sim, &atmosphere);
    }

    let launch = if cli.interactive {
        let stdin = io::stdin();
        prompt::prompt_launch(&mut stdin.lock(), &mut io::stdout(), run.sim.dry_mass_floor)
            .context("reading launch parameters")?
    } else {
        run.launch
            .unwrap_or_else(presets::demonstrator)
            .validate(run.sim.dry_mass_floor)
            .context("invalid launch parameters")?
    };

    info!(
        mass = launch.params().initial_mass,
        velocity = launch.params().velocity,
        angle = launch.params().angle_of_attack_deg,
        steps = run.sim.step_count(),
        "starting simulation"
    );
    let trajectory =
        sim::simulate(&launch, &run.sim, &atmosphere).context("invalid simulation settings")?;

    if let Some(i) = trajectory.first_non_finite() {
        warn!(record = i, "trajectory contains non-finite values");
    }

    print_report(&launch, &run.sim, &trajectory);

    if let Some(path) = &cli.csv {
        csv::write_trajectory_file(path, &trajectory)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), records = trajectory.len(), "wrote trajectory CSV");
    }
    if let Some(path) = &cli.json {
        let summary = json::FlightSummary::from_trajectory(&trajectory, &run.sim)
            .context("empty trajectory")?;
        json::write_summary_file(path, &summary)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "wrote flight summary");
    }

    Ok(())
}

/// CLI flags win over the run file.
fn apply_overrides(cli: &Cli, run: &mut RunFile) {
    let sim = &mut run.sim;
    if let Some(g) = cli.gravity {
        sim.gravity = g.into();
    }
    if let Some(d) = cli.drag {
        sim.drag = d.into();
    }
    if let Some(p) = cli.propulsion {
        sim.propulsion = p.into();
    }
    if let Some(dt) = cli.dt {
        sim.dt = dt;
    }
    if let Some(n) = cli.steps {
        sim.termination = Termination::Steps(n);
    }
    if let Some(t) = cli.t_max {
        sim.termination = Termination::Elapsed(t);
    }

    let has_launch_flag = cli.mass.is_some()
        || cli.velocity.is_some()
        || cli.angle.is_some()
        || cli.radius.is_some()
        || cli.intake.is_some();
    if has_launch_flag {
        let mut p = run.launch.unwrap_or_else(presets::demonstrator);
        p.initial_mass = cli.mass.unwrap_or(p.initial_mass);
        p.velocity = cli.velocity.unwrap_or(p.velocity);
        p.angle_of_attack_deg = cli.angle.unwrap_or(p.angle_of_attack_deg);
        p.radius = cli.radius.unwrap_or(p.radius);
        p.intake_area_percent = cli.intake.unwrap_or(p.intake_area_percent);
        run.launch = Some(p);
    }
}

fn run_sweep(base: &LaunchParams, range: &[f64], config: &SimConfig, atmosphere: &AtmosphereTable) -> Result<()> {
    let [start, stop, step] = range else {
        bail!("--sweep-angles takes exactly three values");
    };
    if !(*step > 0.0) {
        bail!("sweep step must be positive, got {}", step);
    }
    let angles = sweep::inclusive_range(*start, *stop, *step);
    let runs = sweep::sweep_angle(base, &angles, config, atmosphere).context("angle sweep failed")?;

    println!();
    println!("  Angle-of-attack sweep ({} runs, {} steps each)", runs.len(), config.step_count());
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>11}  {:>10}  {:>10}  {:>9}  {:>9}",
        "AoA", "x (m)", "y (m)", "max y (m)", "vx (m/s)", "fuel (kg)"
    );
    println!("  {}", "─".repeat(66));
    for r in &runs {
        let Some(last) = r.trajectory.last() else { continue };
        let max_y = r.trajectory.iter().map(|s| s.pos.y).fold(f64::NEG_INFINITY, f64::max);
        let fuel = r.trajectory.first().map_or(0.0, |f| f.mass - last.mass);
        println!(
            "  {:>7.1}  {:>11.1}  {:>10.1}  {:>10.1}  {:>9.1}  {:>9.2}",
            r.value, last.pos.x, last.pos.y, max_y, last.vel.x, fuel
        );
    }
    println!();
    Ok(())
}

fn print_report(launch: &ValidatedLaunch, config: &SimConfig, trajectory: &Trajectory) {
    let p = launch.params();
    let geometry = launch.geometry();
    let Some(summary) = json::FlightSummary::from_trajectory(trajectory, config) else {
        return;
    };

    println!();
    println!("====================================================================");
    println!("  AIR-BREATHING CLIMB SIMULATION");
    println!("====================================================================");
    println!();
    println!("  Launch Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Mass:          {:>8.1} kg    Dry floor:    {:>8.1} kg",
        p.initial_mass, config.dry_mass_floor
    );
    println!(
        "  Velocity:      {:>8.1} m/s   AoA:          {:>8.1} deg",
        p.velocity, p.angle_of_attack_deg
    );
    println!(
        "  Radius:        {:>8.3} m     Intake:       {:>8.4} m^2 ({:.0} %)",
        geometry.radius, geometry.intake_area, p.intake_area_percent
    );
    println!(
        "  Models:        gravity={:?}  drag={:?}  propulsion={:?}",
        config.gravity, config.drag, config.propulsion
    );
    println!();

    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    let events = detect_events(trajectory, &mut default_detectors(config.dry_mass_floor));
    if events.is_empty() {
        println!("  (none)");
    }
    for e in &events {
        let label = match e.kind {
            EventKind::Burnout => "BURNOUT".to_string(),
            EventKind::Apogee => "APOGEE".to_string(),
            EventKind::ClimbOnset => "CLIMB".to_string(),
            EventKind::Altitude { altitude, ascending } => {
                format!("{} {:.0}m", if ascending { "ABOVE" } else { "BELOW" }, altitude)
            }
        };
        println!(
            "  {:<11} t={:>6.2}s   alt={:>8.1}m   vx={:>7.1}m/s   vy={:>7.1}m/s",
            label, e.time, e.state.pos.y, e.state.vel.x, e.state.vel.y
        );
    }
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Max altitude:  {:>8.0} m   at t={:.1} s",
        summary.max_altitude_m, summary.max_altitude_time_s
    );
    println!("  Max speed:     {:>8.1} m/s", summary.max_speed_ms);
    println!(
        "  Final state:   x={:.0} m  y={:.0} m  |v|={:.1} m/s",
        summary.final_downrange_m, summary.final_altitude_m, summary.final_speed_ms
    );
    println!(
        "  Fuel burned:   {:>8.2} kg  (final mass {:.2} kg)",
        summary.fuel_burned_kg, summary.final_mass_kg
    );
    println!("  Oxidizer saved:{:>8.3} t", summary.oxidizer_saved_t);
    println!(
        "  Horizontal:    {:>8.1} m/s with {:.0} m/s Earth rotation",
        summary.inertial_horizontal_speed_ms, EARTH_ROTATION_SPEED
    );
    match summary.climb_onset_horizontal_speed_ms {
        Some(v) => println!("  Climb onset:   {:>8.1} m/s horizontal (suggested release speed)", v),
        None => println!("  Climb onset:   not reached"),
    }
    println!();

    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>10}  {:>9}  {:>8}  {:>8}  {:>9}  {:>8}",
        "t (s)", "x (m)", "y (m)", "vx", "vy", "thrust(N)", "mass(kg)"
    );
    println!("  {}", "─".repeat(68));

    let sample_interval = (trajectory.len() / 30).max(1);
    for (i, s) in trajectory.iter().enumerate() {
        if i % sample_interval != 0 && i != trajectory.len() - 1 {
            continue;
        }
        println!(
            "  {:>7.2}  {:>10.1}  {:>9.1}  {:>8.1}  {:>8.1}  {:>9.1}  {:>8.2}",
            s.time, s.pos.x, s.pos.y, s.vel.x, s.vel.y, s.thrust, s.mass
        );
    }

    println!();
    println!("  Simulation: {} steps, dt={} s", summary.steps, config.dt);
    println!("====================================================================");
    println!();
}
