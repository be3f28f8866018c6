//! Wall clock, clock style and minute ticks.
//!
//! The watchface reads the time itself whenever it renders, so the host only
//! has to provide two things:
//! - a [`Clock`] answering "what time is it" and "is 24-hour style on",
//! - a minute tick, which the simulator derives from the same clock with a
//!   [`MinuteTicker`].
//!
//! # Time Formatting
//!
//! [`format_time`] always produces exactly five characters (`HH:MM`) in a
//! `heapless::String<5>`, so the text layer can hold it without allocation.
//! In 12-hour style the hour runs `01..=12`, with midnight and noon shown as `12`.

use core::fmt::Write;

use chrono::{Local, NaiveTime, Timelike};
use heapless::String;

/// Length of a rendered time, `"HH:MM"`.
pub const TIME_TEXT_LEN: usize = 5;

/// Fixed-width buffer holding a rendered time.
pub type TimeText = String<TIME_TEXT_LEN>;

/// Host clock collaborator.
pub trait Clock {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveTime;

    /// Whether the host is set to 24-hour display. Consulted on every render.
    fn is_24h_style(&self) -> bool;
}

/// Format `time` as `HH:MM` in 24-hour or 12-hour style.
pub fn format_time(time: NaiveTime, is_24h: bool) -> TimeText {
    let hour = if is_24h {
        time.hour()
    } else {
        // (is_pm, hour12) with hour12 in 1..=12
        time.hour12().1
    };

    let mut text = TimeText::new();
    // Both fields are < 100, so five characters always fit.
    let _ = write!(text, "{:02}:{:02}", hour, time.minute());
    text
}

// =============================================================================
// Clock Implementations
// =============================================================================

/// Local system time with a host-controlled display style.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    is_24h: bool,
}

impl SystemClock {
    pub const fn new(is_24h: bool) -> Self { Self { is_24h } }

    /// Flip between 12-hour and 24-hour display.
    pub const fn toggle_style(&mut self) { self.is_24h = !self.is_24h; }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime { Local::now().time() }

    fn is_24h_style(&self) -> bool { self.is_24h }
}

/// A clock that only moves when told to.
///
/// Used by tests and by the simulator when started at a fixed time.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock {
    time: NaiveTime,
    is_24h: bool,
}

impl FixedClock {
    pub const fn new(time: NaiveTime, is_24h: bool) -> Self { Self { time, is_24h } }

    /// Move the clock forward, wrapping at midnight.
    pub fn advance(&mut self, by: chrono::Duration) {
        let (time, _) = self.time.overflowing_add_signed(by);
        self.time = time;
    }

    pub const fn toggle_style(&mut self) { self.is_24h = !self.is_24h; }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime { self.time }

    fn is_24h_style(&self) -> bool { self.is_24h }
}

// =============================================================================
// Minute Ticks
// =============================================================================

/// Turns periodic clock readings into one tick per minute boundary.
///
/// The first reading only establishes the current minute; a tick is reported
/// when a later reading lands in a different minute. Several minutes skipped
/// between readings still produce a single tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinuteTicker {
    last_minute: Option<(u32, u32)>,
}

impl MinuteTicker {
    pub const fn new() -> Self { Self { last_minute: None } }

    /// Record a reading. Returns `true` when the minute changed since the last one.
    pub fn poll(&mut self, now: NaiveTime) -> bool {
        let minute = (now.hour(), now.minute());
        match self.last_minute.replace(minute) {
            Some(previous) => previous != minute,
            None => false,
        }
    }
}
