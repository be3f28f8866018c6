//! The watchface screen: layers, jaw animation and the window lifecycle.
//!
//! [`Watchface::load`] is the window's load hook. It loads the three images,
//! builds the layer stack and hands [`Event::Loaded`] to the
//! [`JawController`], which schedules the first (delayed) jaw opening.
//! [`Watchface::unload`] is the unload hook and hands every resource back.
//!
//! Between the two, the host event loop calls:
//! - [`Watchface::advance`] with the elapsed frame time, which moves the jaw
//!   and reports animation completion to the controller,
//! - [`Watchface::handle_minute_tick`] once per minute,
//! - [`Watchface::draw`] to push the composed frame to the display.
//!
//! All controller effects are carried out here, in the order the controller
//! lists them.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::info;

use crate::animations::JawAnimation;
use crate::assets::{AssetStore, ImageSet, ResourceId};
use crate::bitmap::{Bitmap, CompositingMode};
use crate::clock::{Clock, format_time};
use crate::config::{CLOSED_JAW_X, CLOSED_JAW_Y, OPEN_JAW_X, OPEN_JAW_Y, TIME_X, TIME_Y};
use crate::controller::{Effect, Event, JawController, JawPosition, Phase};
use crate::layers::{BitmapLayer, LayerId, LayerStack, TextLayer};

/// Count of everything [`Watchface::unload`] handed back or destroyed.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Released {
    pub images: usize,
    pub bitmap_layers: usize,
    pub text_layers: usize,
    pub animations: usize,
}

/// One loaded watchface screen.
#[derive(Debug)]
pub struct Watchface {
    controller: JawController,
    images: ImageSet,
    layers: LayerStack,
    time_layer: LayerId,
    jaw_black_layer: LayerId,
    jaw_white_layer: LayerId,
    closed_position: Rectangle,
    open_position: Rectangle,
    animation: Option<JawAnimation>,
    frame: Bitmap,
}

impl Watchface {
    /// Window load hook: build every layer and schedule the first opening.
    pub fn load<S: AssetStore, C: Clock>(window_bounds: Rectangle, store: &mut S, clock: &C) -> Self {
        let images = ImageSet::load(store);

        // Both jaw variants share their native bounds; take the size from the white one
        let jaw_size = images.get(ResourceId::JawWhite).bounds().size;
        let closed_position = Rectangle::new(Point::new(CLOSED_JAW_X, CLOSED_JAW_Y), jaw_size);
        let open_position = Rectangle::new(Point::new(OPEN_JAW_X, OPEN_JAW_Y), jaw_size);

        let mut layers = LayerStack::new();
        layers.add_bitmap(BitmapLayer::new(window_bounds, ResourceId::Background, CompositingMode::Assign));

        let mut time = TextLayer::new(Rectangle::new(Point::new(TIME_X, TIME_Y), jaw_size));
        time.set_text("00:00");
        time.hidden = true;
        let time_layer = layers.add_text(time);

        let jaw_black_layer =
            layers.add_bitmap(BitmapLayer::new(closed_position, ResourceId::JawBlack, CompositingMode::Clear));
        let jaw_white_layer =
            layers.add_bitmap(BitmapLayer::new(closed_position, ResourceId::JawWhite, CompositingMode::Or));

        let mut watchface = Self {
            controller: JawController::new(),
            images,
            layers,
            time_layer,
            jaw_black_layer,
            jaw_white_layer,
            closed_position,
            open_position,
            animation: None,
            frame: Bitmap::new(window_bounds.size),
        };

        watchface.render_time(clock);
        info!("Watchface loaded, jaw {}x{}", jaw_size.width, jaw_size.height);
        watchface.dispatch(Event::Loaded, clock);
        watchface
    }

    /// Window unload hook: release every image and destroy every layer.
    pub fn unload<S: AssetStore>(self, store: &mut S) -> Released {
        let Self {
            images,
            mut layers,
            animation,
            ..
        } = self;

        let (bitmap_layers, text_layers) = layers.destroy_all();
        let released = Released {
            images: images.release(store),
            bitmap_layers,
            text_layers,
            animations: usize::from(animation.is_some()),
        };
        info!("Watchface unloaded: {released:?}");
        released
    }

    // -------------------------------------------------------------------------
    // Host Events
    // -------------------------------------------------------------------------

    /// Minute tick from the clock service.
    pub fn handle_minute_tick<C: Clock>(&mut self, clock: &C) { self.dispatch(Event::MinuteTick, clock); }

    /// Move the running jaw animation forward by `dt_ms`.
    ///
    /// Time left over when an animation finishes goes to the animation its
    /// completion starts, so a reopen after a close does not lag a frame.
    pub fn advance<C: Clock>(&mut self, dt_ms: u32, clock: &C) {
        let mut remaining = dt_ms;
        while let Some(animation) = self.animation.as_mut() {
            let Some(overshoot) = animation.advance(remaining, &mut self.layers) else {
                return;
            };
            self.animation = None;
            self.dispatch(Event::AnimationFinished, clock);
            if overshoot == 0 {
                return;
            }
            remaining = overshoot;
        }
    }

    fn dispatch<C: Clock>(&mut self, event: Event, clock: &C) {
        let Some(effects) = self.controller.handle(event) else {
            return;
        };
        for &effect in effects {
            match effect {
                Effect::StartJawAnimation { delay_ms, from, to } => {
                    self.run_jaw_animation(delay_ms, self.position(from), self.position(to));
                }
                Effect::RevealTime => {
                    self.render_time(clock);
                    self.set_time_hidden(false);
                }
                Effect::HideTime => self.set_time_hidden(true),
            }
        }
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Write the current wall-clock time into the time layer as `HH:MM`.
    pub fn render_time<C: Clock>(&mut self, clock: &C) {
        let text = format_time(clock.now(), clock.is_24h_style());
        if let Some(layer) = self.layers.text_mut(self.time_layer) {
            layer.set_text(&text);
        }
    }

    /// Start both jaw layers moving from `start` to `end` after `delay_ms`.
    ///
    /// Replaces any animation still running. Completion is reported to the
    /// controller by [`Self::advance`].
    pub fn run_jaw_animation(&mut self, delay_ms: u32, start: Rectangle, end: Rectangle) {
        info!("Jaw {:?} -> {:?} (delay {delay_ms} ms)", start.top_left, end.top_left);
        for id in [self.jaw_black_layer, self.jaw_white_layer] {
            if let Some(layer) = self.layers.bitmap_mut(id) {
                layer.frame = start;
            }
        }
        self.animation = Some(JawAnimation::new(self.jaw_black_layer, self.jaw_white_layer, delay_ms, start, end));
    }

    /// Compose the layers and push the frame to `target`.
    pub fn draw<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        self.layers.render(&mut self.frame, &self.images);
        target.draw_iter(self.frame.pixels())
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub const fn phase(&self) -> Phase { self.controller.phase() }

    #[inline]
    pub const fn time_shown(&self) -> bool { self.controller.time_shown() }

    #[inline]
    pub const fn closed_position(&self) -> Rectangle { self.closed_position }

    #[inline]
    pub const fn open_position(&self) -> Rectangle { self.open_position }

    #[inline]
    pub const fn is_animating(&self) -> bool { self.animation.is_some() }

    /// Text currently held by the time layer.
    pub fn time_text(&self) -> &str { self.layers.text(self.time_layer).map_or("", |layer| layer.text.as_str()) }

    /// Whether the time layer is unhidden.
    pub fn time_visible(&self) -> bool { self.layers.text(self.time_layer).is_some_and(|layer| !layer.hidden) }

    /// Frames of the black and white jaw layers.
    pub fn jaw_frames(&self) -> (Option<Rectangle>, Option<Rectangle>) {
        (
            self.layers.bitmap(self.jaw_black_layer).map(|layer| layer.frame),
            self.layers.bitmap(self.jaw_white_layer).map(|layer| layer.frame),
        )
    }

    #[inline]
    const fn position(&self, position: JawPosition) -> Rectangle {
        match position {
            JawPosition::Closed => self.closed_position,
            JawPosition::Open => self.open_position,
        }
    }

    fn set_time_hidden(&mut self, hidden: bool) {
        if let Some(layer) = self.layers.text_mut(self.time_layer) {
            layer.hidden = hidden;
        }
    }
}
