//! Jaw watchface - testable modules for the animated face.
//!
//! A face whose jaw drops once a minute to reveal the time. The library holds
//! everything except the desktop window, so the whole animation cycle runs and
//! is tested on the host without SDL2.
//!
//! - [`config`]: Layout, timing and simulator runtime configuration
//! - [`colors`]: 1-bit color names
//! - [`bitmap`]: Owned 1-bit bitmaps and `Clear`/`Or` compositing
//! - [`assets`]: Bundled images and the asset store
//! - [`layers`]: Bitmap and text layers composed into a frame
//! - [`animations`]: Easing curves and the paired jaw animation
//! - [`clock`]: Wall clock, 12/24-hour formatting and minute ticks
//! - [`controller`]: The four-phase jaw state machine
//! - [`watchface`]: The screen tying it all together
//!
//! # Testing
//!
//! Run tests on host without the simulator window:
//! ```bash
//! cargo test --lib --no-default-features
//! ```

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod animations;
pub mod assets;
pub mod bitmap;
pub mod clock;
pub mod colors;
pub mod config;
pub mod controller;
pub mod layers;
pub mod watchface;

// Re-export commonly used items
pub use controller::{Event, Phase};
pub use watchface::Watchface;
