//! Layer tree for the single watchface window.
//!
//! Layers are drawn in the order they were added, so later layers sit on top:
//!
//! ```text
//! 0  background   BitmapLayer  Assign  (window bounds)
//! 1  time text    TextLayer            (jaw-sized, at TIME_X/TIME_Y)
//! 2  jaw black    BitmapLayer  Clear   (animated frame)
//! 3  jaw white    BitmapLayer  Or      (animated frame)
//! ```
//!
//! The whole stack is composed into a [`Bitmap`] frame first, because the
//! `Clear` and `Or` modes need to read the pixels already drawn underneath.
//! The finished frame is then flushed to the display in one pass.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyle, TextStyleBuilder};
use profont::PROFONT_18_POINT;

use crate::assets::{ImageSet, ResourceId};
use crate::bitmap::{Bitmap, CompositingMode};
use crate::clock::TimeText;
use crate::colors::{BLACK, WHITE};

/// White time text on a transparent background.
pub const TIME_STYLE: MonoTextStyle<'static, BinaryColor> = MonoTextStyle::new(&PROFONT_18_POINT, WHITE);

/// Text centred on its anchor point in both axes.
const CENTERED_MIDDLE: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Middle)
    .build();

/// Handle to a layer in a [`LayerStack`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LayerId(usize);

/// A bitmap positioned on screen and blended with a fixed mode.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BitmapLayer {
    pub frame: Rectangle,
    pub image: ResourceId,
    pub mode: CompositingMode,
}

impl BitmapLayer {
    pub const fn new(frame: Rectangle, image: ResourceId, mode: CompositingMode) -> Self {
        Self { frame, image, mode }
    }
}

/// A single line of centred text.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TextLayer {
    pub frame: Rectangle,
    pub text: TimeText,
    pub hidden: bool,
}

impl TextLayer {
    pub fn new(frame: Rectangle) -> Self {
        Self {
            frame,
            text: TimeText::new(),
            hidden: false,
        }
    }

    /// Replace the text. The layer keeps its own copy.
    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        // TimeText holds exactly one HH:MM string; anything longer is cut.
        for ch in text.chars() {
            if self.text.push(ch).is_err() {
                break;
            }
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
enum Layer {
    Bitmap(BitmapLayer),
    Text(TextLayer),
}

/// Ordered children of the window's root layer.
#[derive(Debug, Default)]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    pub const fn new() -> Self { Self { layers: Vec::new() } }

    #[inline]
    pub fn len(&self) -> usize { self.layers.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.layers.is_empty() }

    pub fn add_bitmap(&mut self, layer: BitmapLayer) -> LayerId {
        self.layers.push(Layer::Bitmap(layer));
        LayerId(self.layers.len() - 1)
    }

    pub fn add_text(&mut self, layer: TextLayer) -> LayerId {
        self.layers.push(Layer::Text(layer));
        LayerId(self.layers.len() - 1)
    }

    /// Bitmap layer behind `id`, if `id` names one.
    pub fn bitmap(&self, id: LayerId) -> Option<&BitmapLayer> {
        match self.layers.get(id.0) {
            Some(Layer::Bitmap(layer)) => Some(layer),
            _ => None,
        }
    }

    pub fn bitmap_mut(&mut self, id: LayerId) -> Option<&mut BitmapLayer> {
        match self.layers.get_mut(id.0) {
            Some(Layer::Bitmap(layer)) => Some(layer),
            _ => None,
        }
    }

    /// Text layer behind `id`, if `id` names one.
    pub fn text(&self, id: LayerId) -> Option<&TextLayer> {
        match self.layers.get(id.0) {
            Some(Layer::Text(layer)) => Some(layer),
            _ => None,
        }
    }

    pub fn text_mut(&mut self, id: LayerId) -> Option<&mut TextLayer> {
        match self.layers.get_mut(id.0) {
            Some(Layer::Text(layer)) => Some(layer),
            _ => None,
        }
    }

    /// Remove every layer. Returns `(bitmap layers, text layers)` removed.
    pub fn destroy_all(&mut self) -> (usize, usize) {
        let mut bitmaps = 0;
        let mut texts = 0;
        for layer in self.layers.drain(..) {
            match layer {
                Layer::Bitmap(_) => bitmaps += 1,
                Layer::Text(_) => texts += 1,
            }
        }
        (bitmaps, texts)
    }

    /// Compose the bitmap layers and any unhidden text, bottom to top, into `frame`.
    pub fn render(&self, frame: &mut Bitmap, images: &ImageSet) {
        frame.clear(BLACK).ok();

        for layer in &self.layers {
            match layer {
                Layer::Bitmap(layer) => {
                    frame.composite(images.get(layer.image), layer.frame.top_left, layer.mode);
                }
                Layer::Text(layer) if !layer.hidden => {
                    Text::with_text_style(&layer.text, layer.frame.center(), TIME_STYLE, CENTERED_MIDDLE)
                        .draw(frame)
                        .ok();
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::BundledAssets;
    use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

    fn screen() -> Rectangle { Rectangle::new(Point::zero(), Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)) }

    #[test]
    fn test_layer_ids_are_typed() {
        let mut stack = LayerStack::new();
        let bg = stack.add_bitmap(BitmapLayer::new(screen(), ResourceId::Background, CompositingMode::Assign));
        let text = stack.add_text(TextLayer::new(screen()));

        assert!(stack.bitmap(bg).is_some());
        assert!(stack.text(bg).is_none(), "Bitmap id must not resolve to a text layer");
        assert!(stack.text(text).is_some());
        assert!(stack.bitmap_mut(text).is_none());
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_set_text_truncates() {
        let mut layer = TextLayer::new(screen());
        layer.set_text("12:34");
        assert_eq!(layer.text.as_str(), "12:34");
        layer.set_text("12:345678");
        assert_eq!(layer.text.as_str(), "12:34");
    }

    #[test]
    fn test_destroy_all_counts() {
        let mut stack = LayerStack::new();
        stack.add_bitmap(BitmapLayer::new(screen(), ResourceId::Background, CompositingMode::Assign));
        stack.add_text(TextLayer::new(screen()));
        stack.add_bitmap(BitmapLayer::new(screen(), ResourceId::JawBlack, CompositingMode::Clear));

        assert_eq!(stack.destroy_all(), (2, 1));
        assert!(stack.is_empty());
        assert_eq!(stack.destroy_all(), (0, 0), "Second destroy has nothing left");
    }

    #[test]
    fn test_hidden_text_not_drawn() {
        let mut store = BundledAssets::new();
        let images = ImageSet::load(&mut store);
        let mut frame = Bitmap::new(screen().size);

        let mut stack = LayerStack::new();
        let text = stack.add_text(TextLayer::new(Rectangle::new(Point::new(40, 80), Size::new(64, 32))));
        stack.text_mut(text).unwrap().set_text("88:88");

        stack.render(&mut frame, &images);
        let visible = frame.count_lit();
        assert!(visible > 0, "Visible text should light pixels");

        stack.text_mut(text).unwrap().hidden = true;
        stack.render(&mut frame, &images);
        assert_eq!(frame.count_lit(), 0);

        images.release(&mut store);
    }

    #[test]
    fn test_jaw_compositing_over_background() {
        let mut store = BundledAssets::new();
        let images = ImageSet::load(&mut store);
        let mut frame = Bitmap::new(screen().size);

        let jaw = Rectangle::new(Point::new(40, 83), Size::new(64, 32));
        let mut stack = LayerStack::new();
        stack.add_bitmap(BitmapLayer::new(screen(), ResourceId::Background, CompositingMode::Assign));
        stack.add_bitmap(BitmapLayer::new(jaw, ResourceId::JawBlack, CompositingMode::Clear));
        stack.add_bitmap(BitmapLayer::new(jaw, ResourceId::JawWhite, CompositingMode::Or));
        stack.render(&mut frame, &images);

        // Centre of the chin is lit by the white jaw, the mask border stays dark
        assert!(frame.pixel(Point::new(72, 83 + 20)));
        assert!(!frame.pixel(Point::new(41, 83 + 16)), "Mask edge should be cleared");

        images.release(&mut store);
    }
}
