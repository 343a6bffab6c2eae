//! Equations sidebar and status bar
//!
//! Displays the model's equations, the thermal color stages, and live
//! simulation figures using egui.

use egui::{Color32, Context, RichText};

use crate::attractor::{Attractor, Color};
use crate::simulation::FrameStats;

/// An equation with its name and formula
pub struct Equation {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

/// Live figures shown in the status bar
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HudStatus {
    pub particles: usize,
    pub spawned: u64,
    pub absorbed: u64,
    pub fps: f32,
    pub time_scale: f32,
}

impl HudStatus {
    /// Accumulate a frame's spawn and absorption counts
    pub fn record(&mut self, stats: &FrameStats) {
        self.spawned += stats.spawned as u64;
        self.absorbed += stats.absorbed as u64;
    }
}

fn swatch(color: Color) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

/// Draw the equations sidebar
pub fn draw_equations_sidebar(
    ctx: &Context,
    title: &str,
    equations: &[Equation],
    variables: &[(&str, &str)],
    attractor: &Attractor,
) {
    egui::SidePanel::right("equations_panel")
        .resizable(true)
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.heading(RichText::new(title).color(Color32::LIGHT_BLUE));
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.collapsing(RichText::new("📐 Equations").strong(), |ui| {
                    for eq in equations {
                        ui.group(|ui| {
                            ui.label(RichText::new(eq.name).strong().color(Color32::YELLOW));
                            ui.label(RichText::new(eq.formula).monospace().color(Color32::WHITE));
                            ui.label(RichText::new(eq.description).small().italics());
                        });
                        ui.add_space(4.0);
                    }
                });

                ui.add_space(8.0);

                ui.collapsing(RichText::new("🌡 Thermal Stages").strong(), |ui| {
                    ui.label(format!(
                        "r > {:.0}: unaffected",
                        attractor.influence_radius()
                    ));
                    for zone in attractor.zones() {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new("■").color(swatch(zone.from)));
                            ui.label("→");
                            ui.label(RichText::new("■").color(swatch(zone.to)));
                            ui.label(format!("{:.0} ≥ r > {:.0}", zone.outer, zone.inner));
                        });
                    }
                    ui.label(format!(
                        "r < {:.0}: absorbed",
                        attractor.core_radius()
                    ));
                });

                ui.add_space(8.0);

                ui.collapsing(RichText::new("📖 Variables").strong(), |ui| {
                    egui::Grid::new("variables_grid")
                        .num_columns(2)
                        .spacing([10.0, 4.0])
                        .show(ui, |ui| {
                            for (symbol, meaning) in variables {
                                ui.label(RichText::new(*symbol).monospace().color(Color32::LIGHT_GREEN));
                                ui.label(*meaning);
                                ui.end_row();
                            }
                        });
                });
            });
        });
}

/// Draw the top status bar
pub fn draw_status_bar(ctx: &Context, attractor: &Attractor, status: HudStatus) {
    egui::TopBottomPanel::top("status").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!("G: {:.0}", attractor.gravity()));
            ui.separator();
            ui.label(format!("Damping: {:.2}", attractor.damping()));
            ui.separator();
            ui.label(format!("Time ×{:.0}", status.time_scale));
            ui.separator();
            ui.label(format!("Particles: {}", status.particles));
            ui.separator();
            ui.label(format!("Spawned: {}", status.spawned));
            ui.separator();
            ui.label(format!("Absorbed: {}", status.absorbed));
            ui.separator();
            ui.label(format!("{:.0} fps", status.fps));
            ui.separator();
            if status.particles == 0 {
                ui.label(RichText::new("Click to spawn particles").color(Color32::GREEN));
            } else {
                ui.label("R: reset  H: hide HUD");
            }
        });
    });
}

// ============================================================================
// Thermal Orbits - Newtonian point attractor
// ============================================================================

pub const THERMAL_ORBIT_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Damped Gravity",
        formula: "a = G·k/r²",
        description: "Acceleration towards the center",
    },
    Equation {
        name: "Initial Orbital Speed",
        formula: "v₀ = 0.99·√(G/r)",
        description: "Just below circular, perpendicular to r",
    },
    Equation {
        name: "Semi-implicit Euler",
        formula: "v += a·Δt,  x += v·Δt",
        description: "Velocity updated before position",
    },
    Equation {
        name: "Zone Radii",
        formula: "r_ph = 8r_c,  r_inf = 2r_ph",
        description: "Photon sphere and influence boundaries",
    },
    Equation {
        name: "Stage Blend",
        formula: "t = (r_out - r)/(r_out - r_in)",
        description: "Linear color blend inside a stage",
    },
];

pub const THERMAL_ORBIT_VARIABLES: &[(&str, &str)] = &[
    ("G", "Gravitational constant"),
    ("k", "Damping factor"),
    ("r", "Distance to the center"),
    ("r_c", "Core (absorption) radius"),
    ("r_ph", "Photon sphere radius"),
    ("r_inf", "Influence radius"),
    ("Δt", "Frame time × time scale"),
    ("t", "Blend parameter, 0 at r_out"),
];
