//! Jaw watchface simulator for desktop.
//!
//! Runs the watchface in an `embedded-graphics-simulator` window at the
//! panel's native 144x168 resolution, scaled up for readability.
//!
//! # Controls
//!
//! | Key | Action |
//! |-----|--------|
//! | `T` | Toggle 12/24-hour style (applies on the next reveal) |
//! | `M` | Deliver a minute tick now |
//!
//! Key repeat is ignored to prevent toggle spam when holding keys.
//!
//! # Environment
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `JAW_CLOCK_24H` | Initial clock style (`1`/`0`/`true`/`false`, default 24h) |
//! | `JAW_START_TIME` | Run a simulated clock from `HH:MM` instead of local time |
//! | `JAW_SCALE` | Window pixel scale, 1-8 |
//! | `RUST_LOG` | Log filter (default `info`) |

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]

use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::NaiveTime;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{BinaryColorTheme, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use env_logger::Env;
use jaw_watchface::Watchface;
use jaw_watchface::assets::BundledAssets;
use jaw_watchface::clock::{Clock, MinuteTicker, SystemClock};
use jaw_watchface::config::{FRAME_TIME, SCREEN_HEIGHT, SCREEN_WIDTH, SimulatorConfig};
use log::{debug, info};

/// Clock backing the simulator: local time, or a simulated clock started at a fixed time.
enum HostClock {
    System(SystemClock),
    Simulated {
        start: NaiveTime,
        started_at: Instant,
        is_24h: bool,
    },
}

impl HostClock {
    fn from_config(config: &SimulatorConfig) -> Self {
        match config.start_time {
            Some(start) => Self::Simulated {
                start,
                started_at: Instant::now(),
                is_24h: config.clock_24h,
            },
            None => Self::System(SystemClock::new(config.clock_24h)),
        }
    }

    fn toggle_style(&mut self) {
        match self {
            Self::System(clock) => clock.toggle_style(),
            Self::Simulated { is_24h, .. } => *is_24h = !*is_24h,
        }
    }
}

impl Clock for HostClock {
    fn now(&self) -> NaiveTime {
        match self {
            Self::System(clock) => clock.now(),
            Self::Simulated { start, started_at, .. } => {
                let elapsed = chrono::Duration::from_std(started_at.elapsed()).unwrap_or_default();
                start.overflowing_add_signed(elapsed).0
            }
        }
    }

    fn is_24h_style(&self) -> bool {
        match self {
            Self::System(clock) => clock.is_24h_style(),
            Self::Simulated { is_24h, .. } => *is_24h,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let config = SimulatorConfig::from_env().context("invalid simulator configuration")?;
    info!("Starting jaw watchface simulator: {config:?}");

    let mut display: SimulatorDisplay<BinaryColor> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let output_settings = OutputSettingsBuilder::new()
        .scale(config.scale)
        .theme(BinaryColorTheme::Default)
        .build();
    let mut window = Window::new("Jaw Watchface", &output_settings);

    let mut clock = HostClock::from_config(&config);
    let mut store = BundledAssets::new();
    let mut watchface = Watchface::load(display.bounding_box(), &mut store, &clock);

    // Subscribe to minute ticks: the first reading only establishes the current minute
    let mut ticker = MinuteTicker::new();
    ticker.poll(clock.now());

    watchface.draw(&mut display)?;
    window.update(&display);

    let mut last_advance = Instant::now();

    'running: loop {
        let frame_start = Instant::now();

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::T => {
                            clock.toggle_style();
                            info!("Clock style: {}", if clock.is_24h_style() { "24h" } else { "12h" });
                        }
                        Keycode::M => {
                            debug!("Manual minute tick");
                            watchface.handle_minute_tick(&clock);
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        // Feed whole milliseconds, keeping the remainder for the next frame
        let elapsed_ms = last_advance.elapsed().as_millis() as u32;
        last_advance += Duration::from_millis(u64::from(elapsed_ms));
        watchface.advance(elapsed_ms, &clock);

        if ticker.poll(clock.now()) {
            watchface.handle_minute_tick(&clock);
        }

        watchface.draw(&mut display)?;
        window.update(&display);

        if let Some(remaining) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
            thread::sleep(remaining);
        }
    }

    let released = watchface.unload(&mut store);
    info!("Shutting down, released {} images", released.images);
    Ok(())
}
