//! Application configuration.
//!
//! Layout and timing values are compile-time constants, so the controller and
//! the renderer never recompute positions per frame. The simulator binary can
//! override a few runtime knobs through environment variables, see
//! [`SimulatorConfig`].

use std::env;
use std::time::Duration;

use chrono::NaiveTime;
use thiserror::Error;

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels (rectangular 1-bit watch panel: 144x168)
pub const SCREEN_WIDTH: u32 = 144;

/// Display height in pixels
pub const SCREEN_HEIGHT: u32 = 168;

// =============================================================================
// Jaw Layout
// =============================================================================

/// Jaw layer X when the mouth is closed.
pub const CLOSED_JAW_X: i32 = 40;

/// Jaw layer Y when the mouth is closed.
pub const CLOSED_JAW_Y: i32 = 83;

/// Jaw layer X when the mouth is open (the jaw only drops vertically).
pub const OPEN_JAW_X: i32 = 40;

/// Jaw layer Y when the mouth is open.
pub const OPEN_JAW_Y: i32 = 104;

/// Time text layer origin. The layer takes the jaw bitmap's size.
pub const TIME_X: i32 = 40;
pub const TIME_Y: i32 = 80;

/// Native size of both jaw bitmaps.
pub const JAW_WIDTH: u32 = 64;
pub const JAW_HEIGHT: u32 = 32;

// =============================================================================
// Timing Configuration
// =============================================================================

/// Duration of every jaw movement, in milliseconds.
pub const JAW_ANIMATION_LENGTH: u32 = 1000;

/// Delay before the first open after the screen loads, in milliseconds.
pub const FIRST_OPEN_DELAY: u32 = 1000;

/// Target frame time (~50 FPS). The simulator loop sleeps if a frame completes early.
pub const FRAME_TIME: Duration = Duration::from_millis(20);

/// Default simulator window scale.
pub const DEFAULT_SCALE: u32 = 3;

// =============================================================================
// Simulator Runtime Configuration
// =============================================================================

/// Environment variable selecting the 12/24-hour style (`1`, `0`, `true`, `false`).
pub const ENV_CLOCK_24H: &str = "JAW_CLOCK_24H";

/// Environment variable starting a simulated clock at `HH:MM` instead of the system clock.
pub const ENV_START_TIME: &str = "JAW_START_TIME";

/// Environment variable overriding the window pixel scale.
pub const ENV_SCALE: &str = "JAW_SCALE";

/// Error type for simulator configuration loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JAW_CLOCK_24H must be one of 1, 0, true, false (got {0:?})")]
    ClockStyle(String),
    #[error("JAW_START_TIME must be HH:MM (got {0:?})")]
    StartTime(String),
    #[error("JAW_SCALE must be an integer between 1 and 8 (got {0:?})")]
    Scale(String),
}

/// Runtime knobs for the desktop simulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Initial clock style. The `T` key toggles it at runtime.
    pub clock_24h: bool,
    /// When set, the simulator runs a clock starting at this time instead of the wall clock.
    pub start_time: Option<NaiveTime>,
    /// Window pixel scale.
    pub scale: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            clock_24h: true,
            start_time: None,
            scale: DEFAULT_SCALE,
        }
    }
}

impl SimulatorConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_CLOCK_24H) {
            config.clock_24h = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => true,
                "0" | "false" => false,
                _ => return Err(ConfigError::ClockStyle(raw)),
            };
        }

        if let Some(raw) = lookup(ENV_START_TIME) {
            let time = NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| ConfigError::StartTime(raw.clone()))?;
            config.start_time = Some(time);
        }

        if let Some(raw) = lookup(ENV_SCALE) {
            config.scale = match raw.trim().parse::<u32>() {
                Ok(scale @ 1..=8) => scale,
                _ => return Err(ConfigError::Scale(raw)),
            };
        }

        Ok(config)
    }
}
