//! Command line configuration

use clap::Parser;

use crate::attractor::{core_radius_for_window, Attractor};
use crate::clock::DEFAULT_TARGET_FPS;
use crate::simulation::DEFAULT_TIME_SCALE;

pub const DEFAULT_WIDTH: u32 = 1366;
pub const DEFAULT_HEIGHT: u32 = 768;
pub const DEFAULT_GRAVITY: f32 = 2500.0;
pub const DEFAULT_DAMPING: f32 = 0.98;

/// Click to drop particles into orbit around a black hole
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about, long_about = None)]
pub struct SimConfig {
    /// Window width in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,
    /// Window height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,
    /// Gravitational constant
    #[arg(short, long, default_value_t = DEFAULT_GRAVITY)]
    pub gravity: f32,
    /// Factor applied to the gravitational acceleration
    #[arg(short, long, default_value_t = DEFAULT_DAMPING)]
    pub damping: f32,
    /// Multiplier applied to the frame time before each physics step
    #[arg(short, long, default_value_t = DEFAULT_TIME_SCALE)]
    pub time_scale: f32,
    /// Frame-rate cap
    #[arg(long, default_value_t = DEFAULT_TARGET_FPS)]
    pub target_fps: u32,
    /// Start with the equations sidebar and status bar hidden
    #[arg(long, default_value_t = false)]
    pub no_hud: bool,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("window size must be positive, got {width}x{height}")]
    EmptyWindow { width: u32, height: u32 },
    #[error("window {width}x{height} is too small for a visible core radius")]
    WindowTooSmall { width: u32, height: u32 },
    #[error("{name} must be a positive finite number, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("target frame rate must be positive")]
    ZeroFrameRate,
}

impl SimConfig {
    /// Check the values that the attractor geometry and clock rely on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyWindow {
                width: self.width,
                height: self.height,
            });
        }
        if core_radius_for_window(self.width, self.height) < 1.0 {
            return Err(ConfigError::WindowTooSmall {
                width: self.width,
                height: self.height,
            });
        }

        for (name, value) in [
            ("gravity", self.gravity),
            ("damping", self.damping),
            ("time scale", self.time_scale),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        if self.target_fps == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }

        Ok(())
    }

    pub fn attractor(&self) -> Attractor {
        Attractor::for_window(self.width, self.height, self.gravity, self.damping)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            gravity: DEFAULT_GRAVITY,
            damping: DEFAULT_DAMPING,
            time_scale: DEFAULT_TIME_SCALE,
            target_fps: DEFAULT_TARGET_FPS,
            no_hud: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_parsed_empty_command_line() {
        let parsed = SimConfig::try_parse_from(["thermal_black_hole"]).unwrap();
        assert_eq!(parsed, SimConfig::default());
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn parses_overrides() {
        let parsed = SimConfig::try_parse_from([
            "thermal_black_hole",
            "--width",
            "800",
            "--height",
            "600",
            "-g",
            "4000",
            "--time-scale",
            "5",
            "--no-hud",
        ])
        .unwrap();

        assert_eq!(parsed.width, 800);
        assert_eq!(parsed.height, 600);
        assert_eq!(parsed.gravity, 4000.0);
        assert_eq!(parsed.time_scale, 5.0);
        assert_eq!(parsed.damping, DEFAULT_DAMPING);
        assert!(parsed.no_hud);
        assert_eq!(parsed.attractor().core_radius(), 24.0);
    }

    #[test]
    fn rejects_bad_values() {
        let config = SimConfig {
            width: 0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyWindow { .. })
        ));

        let config = SimConfig {
            width: 20,
            height: 20,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WindowTooSmall { .. })
        ));

        let config = SimConfig {
            gravity: -1.0,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                name: "gravity",
                value: -1.0
            })
        );

        let config = SimConfig {
            damping: f32::NAN,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SimConfig {
            target_fps: 0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroFrameRate));
    }
}
