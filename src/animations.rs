//! Frame animations for the jaw layers.
//!
//! This module provides:
//! - **Easing**: cubic ease-in-out applied to linear progress
//! - **Property animations**: move one layer's frame between two rectangles
//! - **Jaw animation**: the black and white jaw layers moved as one unit
//!
//! # Timing
//!
//! Every animation has a delay followed by a fixed duration, both in
//! milliseconds. Time only advances when the host calls `advance(dt)`, so the
//! simulator feeds real frame times and tests feed exact values.
//!
//! ```text
//! |<-- delay -->|<------- duration ------->|
//!  frame = from   frame = lerp(from, to, ease(t))     frame = to, stopped
//! ```
//!
//! # Completion
//!
//! A [`JawAnimation`] schedules two property animations with identical delay
//! and duration. Only the black jaw's animation carries the completion
//! handler, so the pair reports completion exactly once. The completing call
//! also returns how far the step ran past the end, so the host can hand that
//! time to the next animation.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::config::JAW_ANIMATION_LENGTH;
use crate::layers::{LayerId, LayerStack};

// =============================================================================
// Easing
// =============================================================================

/// Cubic ease-in-out: slow start, fast middle, slow end.
///
/// Maps linear progress `t` in `0.0..=1.0` to eased progress in the same range.
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let inv = (-2.0f32).mul_add(t, 2.0);
        1.0 - inv * inv * inv / 2.0
    }
}

/// Linear interpolation between two integers, rounded to the nearest pixel.
#[inline]
fn lerp_i32(from: i32, to: i32, progress: f32) -> i32 {
    from + ((to - from) as f32 * progress).round() as i32
}

/// Interpolate position and size of a rectangle.
pub fn lerp_rect(from: Rectangle, to: Rectangle, progress: f32) -> Rectangle {
    Rectangle::new(
        Point::new(
            lerp_i32(from.top_left.x, to.top_left.x, progress),
            lerp_i32(from.top_left.y, to.top_left.y, progress),
        ),
        Size::new(
            lerp_i32(from.size.width as i32, to.size.width as i32, progress) as u32,
            lerp_i32(from.size.height as i32, to.size.height as i32, progress) as u32,
        ),
    )
}

// =============================================================================
// Property Animation
// =============================================================================

/// Animates a layer frame from one rectangle to another.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PropertyAnimation {
    from: Rectangle,
    to: Rectangle,
    delay_ms: u32,
    duration_ms: u32,
    elapsed_ms: u32,
    completed: bool,
}

impl PropertyAnimation {
    pub const fn new(from: Rectangle, to: Rectangle, delay_ms: u32, duration_ms: u32) -> Self {
        Self {
            from,
            to,
            delay_ms,
            duration_ms,
            elapsed_ms: 0,
            completed: false,
        }
    }

    #[inline]
    const fn end_ms(&self) -> u32 { self.delay_ms.saturating_add(self.duration_ms) }

    /// Whether the delay and the full duration have both elapsed.
    #[inline]
    pub const fn is_finished(&self) -> bool { self.elapsed_ms >= self.end_ms() }

    /// Linear progress through the duration, `0.0` during the delay.
    fn progress(&self) -> f32 {
        if self.elapsed_ms <= self.delay_ms {
            return 0.0;
        }
        if self.duration_ms == 0 {
            return 1.0;
        }
        ((self.elapsed_ms - self.delay_ms) as f32 / self.duration_ms as f32).min(1.0)
    }

    /// Frame for the current point in time.
    pub fn frame(&self) -> Rectangle {
        if self.is_finished() {
            return self.to;
        }
        lerp_rect(self.from, self.to, ease_in_out(self.progress()))
    }

    /// Move time forward by `dt_ms`.
    ///
    /// Returns `Some(overshoot)` on the one call that finishes the animation,
    /// where `overshoot` is the part of `dt_ms` past the end. A zero-length
    /// animation finishes on its first call, even with `dt_ms == 0`.
    pub fn advance(&mut self, dt_ms: u32) -> Option<u32> {
        if self.completed {
            return None;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        if !self.is_finished() {
            return None;
        }
        self.completed = true;
        Some(self.elapsed_ms - self.end_ms())
    }
}

// =============================================================================
// Jaw Animation
// =============================================================================

/// Both jaw layers moving together between two rectangles.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct JawAnimation {
    black_layer: LayerId,
    white_layer: LayerId,
    black: PropertyAnimation,
    white: PropertyAnimation,
}

impl JawAnimation {
    /// Schedule both jaw layers from `start` to `end` after `delay_ms`.
    pub const fn new(black_layer: LayerId, white_layer: LayerId, delay_ms: u32, start: Rectangle, end: Rectangle) -> Self {
        let animation = PropertyAnimation::new(start, end, delay_ms, JAW_ANIMATION_LENGTH);
        Self {
            black_layer,
            white_layer,
            black: animation,
            white: animation,
        }
    }

    /// Advance both layers and write their frames into `layers`.
    ///
    /// Returns `Some(overshoot)` exactly once, when the black jaw's animation
    /// stops.
    pub fn advance(&mut self, dt_ms: u32, layers: &mut LayerStack) -> Option<u32> {
        let completed = self.black.advance(dt_ms);
        self.white.advance(dt_ms);

        if let Some(layer) = layers.bitmap_mut(self.black_layer) {
            layer.frame = self.black.frame();
        }
        if let Some(layer) = layers.bitmap_mut(self.white_layer) {
            layer.frame = self.white.frame();
        }

        completed
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
