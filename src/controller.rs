//! Jaw animation state machine.
//!
//! The watchface cycles through four phases. Every transition is a pure
//! function of `(phase, time_shown, event)` returning the next phase and the
//! side effects the screen has to carry out; the screen never decides on its
//! own what to animate next.
//!
//! ```text
//!            Loaded                 AnimationFinished
//!   Idle ───────────────▶ OpeningJaw ─────────────────▶ ShowingTime
//!   (closed)  start open      ▲        reveal time       (open)
//!             after 1000ms    │                              │
//!                             │ AnimationFinished            │ MinuteTick
//!                             │ hide time, start open        │ (time_shown)
//!                             │                              ▼
//!                             └────────────────────────── ClosingJaw
//!                                                  hide time, start close
//! ```
//!
//! # Ignored Events
//!
//! Any event without an edge above is dropped. In particular a minute tick is
//! only acted on in `ShowingTime`: ticks that arrive before the first reveal,
//! or while the jaw is moving, do not start a second animation on top of the
//! running one.

use log::{debug, trace};

use crate::config::FIRST_OPEN_DELAY;

/// Animation phase of the watchface.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum Phase {
    /// Jaw closed, nothing scheduled yet.
    #[default]
    Idle,
    /// Jaw moving from closed to open, time hidden.
    OpeningJaw,
    /// Jaw resting open with the time visible.
    ShowingTime,
    /// Jaw moving from open to closed, time hidden.
    ClosingJaw,
}

impl Phase {
    /// Whether a jaw animation is in flight during this phase.
    #[inline]
    pub const fn is_animating(self) -> bool { matches!(self, Self::OpeningJaw | Self::ClosingJaw) }
}

/// Resting positions of the jaw.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum JawPosition {
    Closed,
    Open,
}

/// Signals delivered by the host event loop.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Event {
    /// The screen finished loading its layers.
    Loaded,
    /// The running jaw animation stopped.
    AnimationFinished,
    /// The wall clock crossed a minute boundary.
    MinuteTick,
}

/// Work the screen performs when a transition fires, in order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Effect {
    StartJawAnimation {
        delay_ms: u32,
        from: JawPosition,
        to: JawPosition,
    },
    /// Render the current time into the text layer and unhide it.
    RevealTime,
    /// Hide the text layer.
    HideTime,
}

/// Result of an accepted event.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Transition {
    pub next: Phase,
    pub effects: &'static [Effect],
}

impl Transition {
    const fn new(next: Phase, effects: &'static [Effect]) -> Self { Self { next, effects } }
}

const OPEN_JAW: Effect = Effect::StartJawAnimation {
    delay_ms: 0,
    from: JawPosition::Closed,
    to: JawPosition::Open,
};

const FIRST_OPEN_JAW: Effect = Effect::StartJawAnimation {
    delay_ms: FIRST_OPEN_DELAY,
    from: JawPosition::Closed,
    to: JawPosition::Open,
};

const CLOSE_JAW: Effect = Effect::StartJawAnimation {
    delay_ms: 0,
    from: JawPosition::Open,
    to: JawPosition::Closed,
};

/// Transition table. Returns `None` when the event is ignored in `phase`.
pub fn transition(phase: Phase, time_shown: bool, event: Event) -> Option<Transition> {
    match (phase, event) {
        (Phase::Idle, Event::Loaded) => Some(Transition::new(Phase::OpeningJaw, &[FIRST_OPEN_JAW])),
        (Phase::OpeningJaw, Event::AnimationFinished) => Some(Transition::new(Phase::ShowingTime, &[Effect::RevealTime])),
        (Phase::ShowingTime, Event::MinuteTick) if time_shown => {
            Some(Transition::new(Phase::ClosingJaw, &[Effect::HideTime, CLOSE_JAW]))
        }
        (Phase::ClosingJaw, Event::AnimationFinished) => {
            Some(Transition::new(Phase::OpeningJaw, &[Effect::HideTime, OPEN_JAW]))
        }
        _ => None,
    }
}

/// Phase and reveal flag of one watchface screen.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct JawController {
    phase: Phase,
    time_shown: bool,
}

impl JawController {
    pub const fn new() -> Self {
        Self {
            phase: Phase::Idle,
            time_shown: false,
        }
    }

    #[inline]
    pub const fn phase(&self) -> Phase { self.phase }

    /// True once the time has been revealed; never cleared afterwards.
    #[inline]
    pub const fn time_shown(&self) -> bool { self.time_shown }

    /// Feed one event. Returns the effects to run, or `None` if it was ignored.
    pub fn handle(&mut self, event: Event) -> Option<&'static [Effect]> {
        let Some(Transition { next, effects }) = transition(self.phase, self.time_shown, event) else {
            trace!("Ignored {event:?} in {:?} (time_shown={})", self.phase, self.time_shown);
            return None;
        };

        debug!("{:?} --{event:?}--> {next:?}", self.phase);
        if effects.contains(&Effect::RevealTime) {
            self.time_shown = true;
        }
        self.phase = next;
        Some(effects)
    }
}
