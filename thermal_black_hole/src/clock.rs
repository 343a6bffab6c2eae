//! Frame clock with a frame-rate cap
//!
//! `tick` waits out the remainder of the target frame time, then reports
//! the real time elapsed since the previous tick in seconds. The elapsed
//! time is not clamped.

use std::time::{Duration, Instant};

/// Default frame-rate cap
pub const DEFAULT_TARGET_FPS: u32 = 120;

#[derive(Debug)]
pub struct FrameClock {
    last_tick: Instant,
    frame_budget: Duration,
    frame_count: u64,
    fps: f32,
    fps_window_start: Instant,
    fps_window_frames: u32,
}

impl FrameClock {
    pub fn new(target_fps: u32) -> Self {
        Self::starting_at(Instant::now(), target_fps)
    }

    pub fn starting_at(now: Instant, target_fps: u32) -> Self {
        Self {
            last_tick: now,
            frame_budget: Duration::from_secs_f64(1.0 / target_fps.max(1) as f64),
            frame_count: 0,
            fps: 0.0,
            fps_window_start: now,
            fps_window_frames: 0,
        }
    }

    /// Sleep until the frame budget is spent, then return `dt` in seconds
    pub fn tick(&mut self) -> f32 {
        let deadline = self.last_tick + self.frame_budget;
        let now = Instant::now();
        if now < deadline {
            std::thread::sleep(deadline - now);
        }
        self.tick_at(Instant::now())
    }

    /// Record a tick at `now` without waiting
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = now.saturating_duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.frame_count += 1;

        self.fps_window_frames += 1;
        let window = now.saturating_duration_since(self.fps_window_start);
        if window >= Duration::from_millis(500) {
            self.fps = self.fps_window_frames as f32 / window.as_secs_f32();
            self.fps_window_frames = 0;
            self.fps_window_start = now;
        }

        dt
    }

    /// Frames ticked so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Measured frame rate, refreshed twice a second
    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frame_budget(&self) -> Duration {
        self.frame_budget
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_FPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_elapsed_seconds_between_ticks() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, 120);

        let dt = clock.tick_at(start + Duration::from_millis(8));
        assert!((dt - 0.008).abs() < 1e-6);

        let dt = clock.tick_at(start + Duration::from_millis(258));
        assert!((dt - 0.25).abs() < 1e-6);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn measures_fps_over_half_second_windows() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, 120);
        for i in 1..=60 {
            clock.tick_at(start + Duration::from_millis(10 * i));
        }
        assert!((clock.fps() - 100.0).abs() < 1.0);
    }

    #[test]
    fn tick_waits_for_frame_budget() {
        let mut clock = FrameClock::new(200);
        let dt = clock.tick();
        assert!(dt >= clock.frame_budget().as_secs_f32() * 0.99);
    }

    #[test]
    fn zero_target_is_treated_as_one_fps() {
        let clock = FrameClock::starting_at(Instant::now(), 0);
        assert_eq!(clock.frame_budget(), Duration::from_secs(1));
    }
}
