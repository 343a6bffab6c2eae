//! Drawing surface consumed by the simulation
//!
//! The simulation only ever issues three primitives plus a frame flip.
//! `DrawList` records them so the GPU renderer (or a test) can replay the
//! frame afterwards in the same order.

use glam::Vec2;

use crate::attractor::Color;

/// Primitive drawing calls offered by the host
pub trait Canvas {
    /// Solid disk
    fn fill_circle(&mut self, color: Color, center: Vec2, radius: f32);

    /// 1px circle outline
    fn stroke_circle(&mut self, color: Color, center: Vec2, radius: f32);

    /// 1px line segment
    fn line(&mut self, color: Color, from: Vec2, to: Vec2);

    /// Mark the frame as complete
    fn present(&mut self);
}

/// A single recorded drawing call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    FillCircle { color: Color, center: Vec2, radius: f32 },
    StrokeCircle { color: Color, center: Vec2, radius: f32 },
    Line { color: Color, from: Vec2, to: Vec2 },
}

/// Canvas that records one frame worth of drawing calls
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    presented: bool,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the recorded frame, keeping the allocation
    pub fn clear(&mut self) {
        self.commands.clear();
        self.presented = false;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_presented(&self) -> bool {
        self.presented
    }

    /// Recorded line segments, in draw order
    pub fn lines(&self) -> impl Iterator<Item = (Color, Vec2, Vec2)> + '_ {
        self.commands.iter().filter_map(|command| match *command {
            DrawCommand::Line { color, from, to } => Some((color, from, to)),
            _ => None,
        })
    }
}

impl Canvas for DrawList {
    fn fill_circle(&mut self, color: Color, center: Vec2, radius: f32) {
        self.commands.push(DrawCommand::FillCircle {
            color,
            center,
            radius,
        });
    }

    fn stroke_circle(&mut self, color: Color, center: Vec2, radius: f32) {
        self.commands.push(DrawCommand::StrokeCircle {
            color,
            center,
            radius,
        });
    }

    fn line(&mut self, color: Color, from: Vec2, to: Vec2) {
        self.commands.push(DrawCommand::Line { color, from, to });
    }

    fn present(&mut self) {
        self.presented = true;
    }
}
