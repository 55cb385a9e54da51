use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use ramjet_sim::config::{self, RunFile};
use ramjet_sim::dynamics::state::{VehicleState, EARTH_ROTATION_SPEED};
use ramjet_sim::io::json::FlightSummary;
use ramjet_sim::physics::AtmosphereTable;
use ramjet_sim::sim::{self, Trajectory};
use ramjet_sim::vehicle::presets;

fn main() -> eframe::Result {
    // Optional run file as the only argument; the demonstrator otherwise.
    let run = match std::env::args().nth(1) {
        Some(path) => match config::load_config(&path) {
            Ok(run) => run,
            Err(e) => {
                eprintln!("{}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => RunFile::default(),
    };
    let launch = match run.launch.unwrap_or_else(presets::demonstrator).validate(run.sim.dry_mass_floor) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("invalid launch parameters: {}", e);
            std::process::exit(1);
        }
    };

    let atmosphere = AtmosphereTable::standard();
    let trajectory = match sim::simulate(&launch, &run.sim, &atmosphere) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let summary = FlightSummary::from_trajectory(&trajectory, &run.sim);

    let app = SimViz { trajectory, summary };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1400.0, 1000.0]),
        ..Default::default()
    };
    eframe::run_native("Ramjet Climb Simulator", options, Box::new(|_| Ok(Box::new(app))))
}

struct SimViz {
    trajectory: Trajectory,
    summary: Option<FlightSummary>,
}

type Series = fn(&VehicleState) -> f64;

/// One chart: title, y-axis label and the plotted channels.
struct Panel {
    id: &'static str,
    title: &'static str,
    lines: &'static [(&'static str, Series)],
}

const PANELS: [Panel; 8] = [
    Panel {
        id: "accel_y",
        title: "Vertical acceleration (m/s^2)",
        lines: &[("a_y", |s| s.accel.y)],
    },
    Panel {
        id: "accel_x",
        title: "Horizontal acceleration (m/s^2)",
        lines: &[("a_x", |s| s.accel.x)],
    },
    Panel {
        id: "vel_y",
        title: "Vertical velocity (m/s)",
        lines: &[("v_y", |s| s.vel.y)],
    },
    Panel {
        id: "vel_x",
        title: "Horizontal velocity (m/s)",
        lines: &[("v_x", |s| s.vel.x), ("v_x + Earth rotation", |s| s.vel.x + EARTH_ROTATION_SPEED)],
    },
    Panel {
        id: "altitude",
        title: "Altitude (m)",
        lines: &[("y", |s| s.pos.y)],
    },
    Panel {
        id: "downrange",
        title: "Ground distance (m)",
        lines: &[("x", |s| s.pos.x)],
    },
    Panel {
        id: "thrust",
        title: "Thrust (N)",
        lines: &[("thrust", |s| s.thrust)],
    },
    Panel {
        id: "fuel",
        title: "Fuel consumption (kg/s)",
        lines: &[("fuel flow", |s| s.fuel_flow)],
    },
];

impl eframe::App for SimViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let step = (self.trajectory.len() / 2000).max(1);
        let sampled: Vec<&VehicleState> = self.trajectory.iter().step_by(step).collect();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading("Air-breathing climb");
            if let Some(s) = &self.summary {
                ui.label(format!(
                    "Max altitude: {:.0} m  |  Downrange: {:.1} km  |  Fuel: {:.1} kg  |  Oxidizer saved: {:.2} t  |  Flight: {:.0} s",
                    s.max_altitude_m,
                    s.final_downrange_m / 1000.0,
                    s.fuel_burned_kg,
                    s.oxidizer_saved_t,
                    s.flight_time_s,
                ));
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let quarter_h = available.y / 4.0 - 24.0;

            for row in PANELS.chunks(2) {
                ui.horizontal(|ui| {
                    for panel in row {
                        ui.vertical(|ui| {
                            ui.label(panel.title);
                            Plot::new(panel.id)
                                .width(half_w)
                                .height(quarter_h)
                                .x_axis_label("Time (s)")
                                .show(ui, |plot_ui| {
                                    for (name, f) in panel.lines {
                                        let points: PlotPoints =
                                            sampled.iter().map(|s| [s.time, f(s)]).collect();
                                        plot_ui.line(Line::new(*name, points));
                                    }
                                });
                        });
                    }
                });
            }
        });
    }
}
