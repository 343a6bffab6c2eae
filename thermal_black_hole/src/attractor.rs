//! The central attractor and its thermal color model
//!
//! The black hole is a fixed point mass with three concentric boundaries:
//! - Core radius: particles crossing inside are absorbed
//! - Photon radius (8x core): hot red turns to deep blue inside it
//! - Influence radius (2x photon): beyond it trails are plain white
//!
//! Distance-to-color mapping is a piecewise linear, blackbody-inspired
//! gradient evaluated over an ordered table of zones.

use glam::Vec2;

/// Photon sphere radius as a multiple of the core radius
pub const PHOTON_RADIUS_FACTOR: f32 = 8.0;
/// Influence radius as a multiple of the photon sphere radius
pub const INFLUENCE_RADIUS_FACTOR: f32 = 2.0;
/// Inner edge of the red-to-blue stage as a multiple of the core radius
pub const INNER_STAGE_FACTOR: f32 = 1.5;
/// Core radius as a fraction of the smaller window dimension
pub const CORE_RADIUS_SCREEN_FRACTION: f32 = 0.04;
/// Fraction of the circular orbital speed given to new particles
pub const ORBITAL_SPEED_FACTOR: f32 = 0.99;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const HOT_RED: Color = Color::rgb(255, 0, 0);
    pub const DEEP_BLUE: Color = Color::rgb(0, 0, 255);
    pub const NAVY: Color = Color::rgb(0, 0, 139);
    pub const PHOTON_RING: Color = Color::rgb(40, 40, 40);
    pub const INFLUENCE_RING: Color = Color::rgb(20, 20, 20);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Per-channel `self * (1 - t) + other * t`, truncated to an integer channel
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let channel = |a: u8, b: u8| -> u8 {
            if a == b {
                return a;
            }
            let value = a as f64 * (1.0 - t) + b as f64 * t;
            value.clamp(0.0, 255.0) as u8
        };

        Color {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
        }
    }

    /// Normalized RGBA for the GPU.
    ///
    /// With an sRGB surface the hardware re-encodes on write, so the
    /// channels are decoded to linear first.
    pub fn to_rgba(self, srgb_surface: bool) -> [f32; 4] {
        let channel = |c: u8| {
            let c = c as f32 / 255.0;
            if !srgb_surface {
                c
            } else if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };

        [channel(self.r), channel(self.g), channel(self.b), 1.0]
    }
}

/// One stage of the thermal gradient.
///
/// A distance `r` belongs to the zone when `outer >= r > inner`; the color
/// blends from `from` at the outer bound to `to` at the inner bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalZone {
    pub outer: f32,
    pub inner: f32,
    pub from: Color,
    pub to: Color,
}

impl ThermalZone {
    pub fn contains(&self, r: f32) -> bool {
        self.outer >= r && r > self.inner
    }

    /// Blend in f64 so exact-integer channel values do not truncate one low
    pub fn color_at(&self, r: f32) -> Color {
        let outer = self.outer as f64;
        let t = (outer - r as f64) / (outer - self.inner as f64);
        self.from.lerp(self.to, t)
    }
}

/// The fixed central attractor ("black hole")
#[derive(Debug, Clone)]
pub struct Attractor {
    center: Vec2,
    core_radius: f32,
    photon_radius: f32,
    influence_radius: f32,
    gravity: f32,
    damping: f32,
    zones: [ThermalZone; 3],
}

impl Attractor {
    /// Build an attractor around `center`.
    ///
    /// `core_radius` must be positive for the radii to be strictly ordered.
    pub fn new(center: Vec2, core_radius: f32, gravity: f32, damping: f32) -> Self {
        let photon_radius = core_radius * PHOTON_RADIUS_FACTOR;
        let influence_radius = photon_radius * INFLUENCE_RADIUS_FACTOR;
        let inner_stage = core_radius * INNER_STAGE_FACTOR;

        // Evaluated in strictly decreasing radius order
        let zones = [
            ThermalZone {
                outer: influence_radius,
                inner: photon_radius,
                from: Color::WHITE,
                to: Color::HOT_RED,
            },
            ThermalZone {
                outer: photon_radius,
                inner: inner_stage,
                from: Color::HOT_RED,
                to: Color::DEEP_BLUE,
            },
            ThermalZone {
                outer: inner_stage,
                inner: core_radius,
                from: Color::DEEP_BLUE,
                to: Color::NAVY,
            },
        ];

        Self {
            center,
            core_radius,
            photon_radius,
            influence_radius,
            gravity,
            damping,
            zones,
        }
    }

    /// Center the attractor in a window, with a core radius proportional
    /// to the smaller window dimension
    pub fn for_window(width: u32, height: u32, gravity: f32, damping: f32) -> Self {
        let center = Vec2::new((width / 2) as f32, (height / 2) as f32);
        Self::new(center, core_radius_for_window(width, height), gravity, damping)
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn core_radius(&self) -> f32 {
        self.core_radius
    }

    pub fn photon_radius(&self) -> f32 {
        self.photon_radius
    }

    pub fn influence_radius(&self) -> f32 {
        self.influence_radius
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn zones(&self) -> &[ThermalZone] {
        &self.zones
    }

    /// Distance from `point` to the center
    pub fn distance_to(&self, point: Vec2) -> f32 {
        (self.center - point).length()
    }

    /// Check if a point lies strictly inside the core
    pub fn absorbs(&self, point: Vec2) -> bool {
        self.distance_to(point) < self.core_radius
    }

    /// Velocity for a near-circular counter-clockwise orbit starting at `point`.
    ///
    /// Speed is `sqrt(G / r) * 0.99`, perpendicular to the radius vector.
    /// A point exactly at the center gets zero velocity.
    pub fn orbital_velocity(&self, point: Vec2) -> Vec2 {
        let d = self.center - point;
        let r = d.length();
        if r == 0.0 {
            return Vec2::ZERO;
        }

        let speed = (self.gravity / r).sqrt() * ORBITAL_SPEED_FACTOR;
        Vec2::new(-d.y / r, d.x / r) * speed
    }

    /// Damped inverse-square acceleration towards the center.
    ///
    /// Returns `None` when `point` is exactly at the center.
    pub fn acceleration_at(&self, point: Vec2) -> Option<Vec2> {
        let d = self.center - point;
        let r = d.length();
        if r == 0.0 {
            return None;
        }

        let magnitude = self.gravity / (r * r) * self.damping;
        Some(d / r * magnitude)
    }

    /// Thermal color for a distance from the center
    pub fn color_for_distance(&self, r: f32) -> Color {
        if r > self.influence_radius {
            return Color::WHITE;
        }

        self.zones
            .iter()
            .find(|zone| zone.contains(r))
            .map(|zone| zone.color_at(r))
            .unwrap_or(Color::NAVY)
    }
}

/// Core radius for a window: `floor(min(width, height) * 0.04)`
pub fn core_radius_for_window(width: u32, height: u32) -> f32 {
    (width.min(height) as f32 * CORE_RADIUS_SCREEN_FRACTION).floor()
}
