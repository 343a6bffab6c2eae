//! Particles orbiting the attractor and their color-graded trails

use std::collections::VecDeque;

use glam::Vec2;

use crate::attractor::{Attractor, Color};
use crate::canvas::Canvas;

/// Maximum number of samples kept in a particle trail
pub const TRAIL_CAPACITY: usize = 50;

/// A position sample with the thermal color at the time it was taken
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSample {
    pub position: Vec2,
    pub color: Color,
}

/// Fixed-capacity FIFO of trail samples, oldest first
#[derive(Debug, Clone)]
pub struct Trail {
    samples: VecDeque<TrailSample>,
    capacity: usize,
}

impl Trail {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            // One slot of headroom for the append-then-evict step
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a sample, evicting exactly one oldest sample when over capacity
    pub fn push(&mut self, sample: TrailSample) {
        self.samples.push_back(sample);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&TrailSample> {
        self.samples.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrailSample> + '_ {
        self.samples.iter()
    }

    /// Consecutive sample pairs, oldest to newest
    pub fn segments(&self) -> impl Iterator<Item = (&TrailSample, &TrailSample)> + '_ {
        self.samples.iter().zip(self.samples.iter().skip(1))
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self::with_capacity(TRAIL_CAPACITY)
    }
}

/// A massless test particle attracted by the black hole
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub trail: Trail,
}

impl Particle {
    /// Spawn a particle on a near-circular orbit around the attractor
    pub fn spawn(position: Vec2, attractor: &Attractor) -> Self {
        Self {
            position,
            velocity: attractor.orbital_velocity(position),
            trail: Trail::default(),
        }
    }

    /// Advance by `dt` with semi-implicit Euler and record a trail sample.
    ///
    /// A particle exactly at the center is left untouched.
    pub fn update(&mut self, dt: f32, attractor: &Attractor) {
        let Some(acceleration) = attractor.acceleration_at(self.position) else {
            return;
        };

        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;

        let color = attractor.color_for_distance(attractor.distance_to(self.position));
        self.trail.push(TrailSample {
            position: self.position,
            color,
        });
    }

    /// Draw the trail as line segments, each in the color of its older end
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for (start, end) in self.trail.segments() {
            canvas.line(start.color, start.position, end.position);
        }
    }
}
