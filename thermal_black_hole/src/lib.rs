//! Thermal Black Hole
//!
//! Click-spawned particles orbit a central attractor under a damped
//! inverse-square pull, leaving trails that shift from white through red
//! to deep blue as they fall inwards, until they cross the core radius
//! and are absorbed.
//!
//! - **attractor**: zone radii and the thermal color model
//! - **particle**: semi-implicit Euler update and bounded trails
//! - **simulation**: the per-frame spawn, update, render, cull cycle
//! - **canvas**: the drawing surface the simulation renders into
//! - **renderer**: wgpu playback of recorded frames

pub mod attractor;
pub mod canvas;
pub mod clock;
pub mod config;
pub mod equations_ui;
pub mod particle;
pub mod renderer;
pub mod simulation;

pub use attractor::{Attractor, Color};
pub use canvas::{Canvas, DrawCommand, DrawList};
pub use particle::{Particle, Trail, TrailSample, TRAIL_CAPACITY};
pub use simulation::{FrameStats, InputEvent, Simulation};
