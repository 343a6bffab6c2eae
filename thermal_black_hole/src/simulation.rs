//! Simulation state and the per-frame lifecycle
//!
//! Each frame: spawn particles for pointer presses, draw the attractor
//! zones, update and draw every live particle in order, cull the ones that
//! crossed the core radius, then present.

use glam::Vec2;

use crate::attractor::{Attractor, Color};
use crate::canvas::Canvas;
use crate::particle::Particle;

/// Default multiplier applied to the frame clock's `dt`
pub const DEFAULT_TIME_SCALE: f32 = 10.0;

/// Input from the host, in render-surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    PointerDown(Vec2),
}

/// What happened during a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub spawned: usize,
    pub absorbed: usize,
    pub quit_requested: bool,
}

/// The attractor and the live particles orbiting it
pub struct Simulation {
    attractor: Attractor,
    particles: Vec<Particle>,
    time_scale: f32,
    elapsed: f32,
}

impl Simulation {
    pub fn new(attractor: Attractor, time_scale: f32) -> Self {
        Self {
            attractor,
            particles: Vec::new(),
            time_scale,
            elapsed: 0.0,
        }
    }

    pub fn attractor(&self) -> &Attractor {
        &self.attractor
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Total scaled simulation time advanced so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Add a particle on a near-circular orbit through `position`
    pub fn spawn(&mut self, position: Vec2) {
        log::debug!(
            "Spawning particle at ({:.1}, {:.1}), r = {:.1}",
            position.x,
            position.y,
            self.attractor.distance_to(position)
        );
        self.particles
            .push(Particle::spawn(position, &self.attractor));
    }

    /// Remove every live particle
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Run one complete frame with the clock's unscaled `dt` in seconds
    pub fn frame<I, C>(&mut self, events: I, dt: f32, canvas: &mut C) -> FrameStats
    where
        I: IntoIterator<Item = InputEvent>,
        C: Canvas + ?Sized,
    {
        let mut stats = FrameStats::default();

        for event in events {
            match event {
                InputEvent::Quit => stats.quit_requested = true,
                InputEvent::PointerDown(position) => {
                    self.spawn(position);
                    stats.spawned += 1;
                }
            }
        }

        self.draw_attractor(canvas);
        stats.absorbed = self.advance(dt * self.time_scale, canvas);
        canvas.present();

        stats
    }

    /// Core disk first, then the rings outwards
    pub fn draw_attractor<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let bh = &self.attractor;
        canvas.fill_circle(Color::BLACK, bh.center(), bh.core_radius());
        canvas.stroke_circle(Color::PHOTON_RING, bh.center(), bh.photon_radius());
        canvas.stroke_circle(Color::INFLUENCE_RING, bh.center(), bh.influence_radius());
    }

    /// Update and draw every particle, then drop the absorbed ones.
    ///
    /// Returns the number of particles absorbed.
    pub fn advance<C: Canvas + ?Sized>(&mut self, dt: f32, canvas: &mut C) -> usize {
        self.elapsed += dt;

        for particle in &mut self.particles {
            particle.update(dt, &self.attractor);
            particle.render(canvas);
        }

        let before = self.particles.len();
        let attractor = &self.attractor;
        self.particles
            .retain(|particle| !attractor.absorbs(particle.position));

        let absorbed = before - self.particles.len();
        if absorbed > 0 {
            log::debug!(
                "{} particle(s) absorbed, {} remaining",
                absorbed,
                self.particles.len()
            );
        }
        absorbed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, DrawList};

    const FRAME_DT: f32 = 1.0 / 120.0;
    const NO_EVENTS: [InputEvent; 0] = [];

    fn simulation() -> Simulation {
        Simulation::new(
            Attractor::for_window(1366, 768, 2500.0, 0.98),
            DEFAULT_TIME_SCALE,
        )
    }

    #[test]
    fn spawns_in_insertion_order() {
        let mut sim = simulation();
        let center = sim.attractor().center();
        let events = [
            InputEvent::PointerDown(center + Vec2::new(100.0, 0.0)),
            InputEvent::PointerDown(center + Vec2::new(0.0, 150.0)),
            InputEvent::PointerDown(center + Vec2::new(-200.0, 0.0)),
        ];

        let mut canvas = DrawList::new();
        let stats = sim.frame(events, FRAME_DT, &mut canvas);

        assert_eq!(stats.spawned, 3);
        assert!(!stats.quit_requested);
        let distances: Vec<f32> = sim
            .particles()
            .iter()
            .map(|p| sim.attractor().distance_to(p.position).round())
            .collect();
        assert_eq!(distances.len(), 3);
        assert!(distances[0] < distances[1] && distances[1] < distances[2]);
    }

    #[test]
    fn frame_draws_zones_before_trails_and_presents() {
        let mut sim = simulation();
        sim.spawn(sim.attractor().center() + Vec2::new(200.0, 0.0));

        let mut canvas = DrawList::new();
        for _ in 0..3 {
            canvas.clear();
            sim.frame(NO_EVENTS, FRAME_DT, &mut canvas);
        }

        let bh = sim.attractor();
        let commands = canvas.commands();
        assert_eq!(
            commands[0],
            DrawCommand::FillCircle {
                color: Color::BLACK,
                center: bh.center(),
                radius: bh.core_radius(),
            }
        );
        assert_eq!(
            commands[1],
            DrawCommand::StrokeCircle {
                color: Color::PHOTON_RING,
                center: bh.center(),
                radius: bh.photon_radius(),
            }
        );
        assert_eq!(
            commands[2],
            DrawCommand::StrokeCircle {
                color: Color::INFLUENCE_RING,
                center: bh.center(),
                radius: bh.influence_radius(),
            }
        );
        // Three samples, two segments
        assert_eq!(canvas.lines().count(), 2);
        assert!(canvas.is_presented());
    }

    #[test]
    fn quit_still_completes_the_frame() {
        let mut sim = simulation();
        let mut canvas = DrawList::new();
        let center = sim.attractor().center();
        let stats = sim.frame(
            [
                InputEvent::Quit,
                InputEvent::PointerDown(center + Vec2::new(120.0, 0.0)),
            ],
            FRAME_DT,
            &mut canvas,
        );

        assert!(stats.quit_requested);
        assert_eq!(sim.particles().len(), 1);
        assert!(canvas.is_presented());
    }

    #[test]
    fn dt_is_scaled_before_updating() {
        let mut sim = simulation();
        let mut canvas = DrawList::new();
        sim.frame(NO_EVENTS, FRAME_DT, &mut canvas);
        assert!((sim.elapsed() - FRAME_DT * DEFAULT_TIME_SCALE).abs() < 1e-6);
    }

    #[test]
    fn absorbed_particles_are_removed_the_same_frame() {
        let mut sim = simulation();
        let center = sim.attractor().center();

        sim.spawn(center + Vec2::new(31.0, 0.0));
        sim.spawn(center + Vec2::new(200.0, 0.0));
        sim.spawn(center + Vec2::new(0.0, -31.0));

        // Send the first and last straight into the core
        sim.particles[0].velocity = Vec2::new(-100.0, 0.0);
        sim.particles[2].velocity = Vec2::new(0.0, 100.0);

        let mut canvas = DrawList::new();
        let stats = sim.frame(NO_EVENTS, FRAME_DT, &mut canvas);

        assert_eq!(stats.absorbed, 2);
        assert_eq!(sim.particles().len(), 1);
        let survivor = &sim.particles()[0];
        assert!((sim.attractor().distance_to(survivor.position) - 200.0).abs() < 5.0);
        assert_eq!(survivor.trail.len(), 1);

        sim.frame(NO_EVENTS, FRAME_DT, &mut canvas);
        assert_eq!(sim.particles()[0].trail.len(), 2);
    }

    #[test]
    fn particle_spawned_at_center_is_culled_without_moving() {
        let mut sim = simulation();
        let center = sim.attractor().center();
        let mut canvas = DrawList::new();

        let stats = sim.frame([InputEvent::PointerDown(center)], FRAME_DT, &mut canvas);

        assert_eq!(stats.spawned, 1);
        assert_eq!(stats.absorbed, 1);
        assert!(sim.particles().is_empty());
        assert_eq!(canvas.lines().count(), 0);
    }

    #[test]
    fn clear_removes_everything() {
        let mut sim = simulation();
        let center = sim.attractor().center();
        sim.spawn(center + Vec2::new(100.0, 0.0));
        sim.spawn(center + Vec2::new(300.0, 0.0));
        sim.clear();
        assert!(sim.particles().is_empty());
    }

    #[test]
    fn orbit_from_200px_stays_bounded_for_500_frames() {
        let mut sim = simulation();
        let center = sim.attractor().center();
        let core = sim.attractor().core_radius();
        let limit = sim.attractor().influence_radius() * 10.0;

        let mut canvas = DrawList::new();
        sim.frame(
            [InputEvent::PointerDown(center + Vec2::new(200.0, 0.0))],
            FRAME_DT,
            &mut canvas,
        );

        for _ in 0..500 {
            canvas.clear();
            let stats = sim.frame(NO_EVENTS, FRAME_DT, &mut canvas);
            assert_eq!(stats.absorbed, 0);
            assert_eq!(sim.particles().len(), 1);

            let r = sim.attractor().distance_to(sim.particles()[0].position);
            assert!(r >= core, "fell into the core: r = {r}");
            assert!(r <= limit, "escaped: r = {r}");
        }
    }
}
