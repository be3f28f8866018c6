//! Bundled image resources.
//!
//! The watchface needs three images: the face background and the two jaw
//! variants. They are loaded by [`ResourceId`] through an [`AssetStore`] when
//! the screen loads and handed back when it unloads.
//!
//! [`BundledAssets`] draws the images with `embedded-graphics` primitives at
//! load time instead of decoding image files, and counts outstanding handles so
//! a leak or a double release shows up in its [`BundledAssets::outstanding`]
//! counter.
//!
//! # Visual Layout
//!
//! ```text
//! ┌──────────────────────┐
//! │     ▄████████████▄   │  face (lit ellipse)
//! │    ██  ●      ●   ██ │  eyes
//! │    ██      ▲      ██ │  nose
//! │    ██ ┌────────┐  ██ │  y=80 mouth cavity (unlit)
//! │    ██ │  jaw   │  ██ │  y=83 closed jaw / y=104 open jaw
//! │     ▀█└────────┘██▀  │
//! └──────────────────────┘
//! ```

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Ellipse, Line, PrimitiveStyle, Rectangle, RoundedRectangle, Triangle};
use log::debug;

use crate::bitmap::Bitmap;
use crate::colors::{BLACK, WHITE};
use crate::config::{JAW_HEIGHT, JAW_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH, TIME_X, TIME_Y};

/// Identifier of a bundled image.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ResourceId {
    Background,
    JawBlack,
    JawWhite,
}

impl ResourceId {
    pub const ALL: [Self; 3] = [Self::Background, Self::JawBlack, Self::JawWhite];

    #[inline]
    const fn index(self) -> usize {
        match self {
            Self::Background => 0,
            Self::JawBlack => 1,
            Self::JawWhite => 2,
        }
    }
}

/// A loaded image together with the identifier it was loaded from.
#[derive(Debug)]
pub struct Image {
    id: ResourceId,
    bitmap: Bitmap,
}

impl Image {
    #[inline]
    pub const fn id(&self) -> ResourceId { self.id }

    #[inline]
    pub const fn bitmap(&self) -> &Bitmap { &self.bitmap }
}

/// Source of image resources.
///
/// `release` takes the image by value, so an image can only be handed back once.
pub trait AssetStore {
    fn load(&mut self, id: ResourceId) -> Image;

    fn release(&mut self, image: Image);
}

/// Images drawn with primitives, with per-resource handle counting.
#[derive(Debug, Default)]
pub struct BundledAssets {
    outstanding: [u32; 3],
    loads: u32,
    releases: u32,
}

impl BundledAssets {
    pub const fn new() -> Self {
        Self {
            outstanding: [0; 3],
            loads: 0,
            releases: 0,
        }
    }

    /// Images of `id` currently loaded and not yet released.
    #[inline]
    pub const fn outstanding(&self, id: ResourceId) -> u32 { self.outstanding[id.index()] }

    /// Total images loaded over the store's lifetime.
    #[inline]
    pub const fn loads(&self) -> u32 { self.loads }

    /// Total images released over the store's lifetime.
    #[inline]
    pub const fn releases(&self) -> u32 { self.releases }
}

impl AssetStore for BundledAssets {
    fn load(&mut self, id: ResourceId) -> Image {
        let bitmap = match id {
            ResourceId::Background => draw_background(),
            ResourceId::JawBlack => draw_jaw_black(),
            ResourceId::JawWhite => draw_jaw_white(),
        };
        self.outstanding[id.index()] += 1;
        self.loads += 1;
        debug!("Loaded {id:?} ({}x{})", bitmap.size().width, bitmap.size().height);
        Image { id, bitmap }
    }

    fn release(&mut self, image: Image) {
        let slot = &mut self.outstanding[image.id.index()];
        *slot = slot.saturating_sub(1);
        self.releases += 1;
        debug!("Released {:?}", image.id);
    }
}

/// The three images the watchface holds while its screen is loaded.
#[derive(Debug)]
pub struct ImageSet {
    background: Image,
    jaw_black: Image,
    jaw_white: Image,
}

impl ImageSet {
    /// Load every bundled image once.
    pub fn load<S: AssetStore>(store: &mut S) -> Self {
        Self {
            background: store.load(ResourceId::Background),
            jaw_black: store.load(ResourceId::JawBlack),
            jaw_white: store.load(ResourceId::JawWhite),
        }
    }

    /// Bitmap loaded for `id`.
    pub const fn get(&self, id: ResourceId) -> &Bitmap {
        match id {
            ResourceId::Background => self.background.bitmap(),
            ResourceId::JawBlack => self.jaw_black.bitmap(),
            ResourceId::JawWhite => self.jaw_white.bitmap(),
        }
    }

    /// Hand every image back to `store`. Returns how many were released.
    pub fn release<S: AssetStore>(self, store: &mut S) -> usize {
        let Self {
            background,
            jaw_black,
            jaw_white,
        } = self;
        let images = [background, jaw_black, jaw_white];
        let count = images.len();
        for image in images {
            store.release(image);
        }
        count
    }
}

// =============================================================================
// Image Drawing
// =============================================================================

const FILL_WHITE: PrimitiveStyle<BinaryColor> = PrimitiveStyle::with_fill(WHITE);
const FILL_BLACK: PrimitiveStyle<BinaryColor> = PrimitiveStyle::with_fill(BLACK);
const STROKE_BLACK: PrimitiveStyle<BinaryColor> = PrimitiveStyle::with_stroke(BLACK, 1);

/// Face with an unlit mouth cavity behind the jaw.
fn draw_background() -> Bitmap {
    let mut bitmap = Bitmap::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));

    // Drawing into a Bitmap is infallible
    Ellipse::new(Point::new(14, 6), Size::new(116, 156))
        .into_styled(FILL_WHITE)
        .draw(&mut bitmap)
        .ok();

    for eye_x in [40, 86] {
        Circle::new(Point::new(eye_x, 42), 18).into_styled(FILL_BLACK).draw(&mut bitmap).ok();
        Circle::new(Point::new(eye_x + 6, 48), 5).into_styled(FILL_WHITE).draw(&mut bitmap).ok();
    }

    Triangle::new(Point::new(72, 56), Point::new(64, 72), Point::new(80, 72))
        .into_styled(STROKE_BLACK)
        .draw(&mut bitmap)
        .ok();

    // Mouth cavity spans the time layer and the closed jaw
    Rectangle::new(Point::new(TIME_X, TIME_Y), Size::new(JAW_WIDTH, JAW_HEIGHT + 8))
        .into_styled(FILL_BLACK)
        .draw(&mut bitmap)
        .ok();

    bitmap
}

/// Mask covering the whole jaw. Composited with `Clear`.
fn draw_jaw_black() -> Bitmap {
    let mut bitmap = Bitmap::new(Size::new(JAW_WIDTH, JAW_HEIGHT));
    RoundedRectangle::with_equal_corners(bitmap.bounds(), Size::new(8, 8))
        .into_styled(FILL_WHITE)
        .draw(&mut bitmap)
        .ok();
    bitmap
}

/// Chin and teeth highlight, inset from the mask. Composited with `Or`.
fn draw_jaw_white() -> Bitmap {
    let mut bitmap = Bitmap::new(Size::new(JAW_WIDTH, JAW_HEIGHT));
    let chin = Rectangle::new(Point::new(2, 2), Size::new(JAW_WIDTH - 4, JAW_HEIGHT - 4));
    RoundedRectangle::with_equal_corners(chin, Size::new(6, 6))
        .into_styled(FILL_WHITE)
        .draw(&mut bitmap)
        .ok();

    // Gum line with tooth gaps above it
    Line::new(Point::new(4, 9), Point::new(JAW_WIDTH as i32 - 5, 9))
        .into_styled(STROKE_BLACK)
        .draw(&mut bitmap)
        .ok();
    for x in (10..JAW_WIDTH as i32 - 4).step_by(8) {
        Line::new(Point::new(x, 2), Point::new(x, 8))
            .into_styled(STROKE_BLACK)
            .draw(&mut bitmap)
            .ok();
    }

    bitmap
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_sizes() {
        let mut store = BundledAssets::new();
        let background = store.load(ResourceId::Background);
        let black = store.load(ResourceId::JawBlack);
        let white = store.load(ResourceId::JawWhite);

        assert_eq!(background.bitmap().size(), Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
        assert_eq!(black.bitmap().size(), Size::new(JAW_WIDTH, JAW_HEIGHT));
        assert_eq!(white.bitmap().size(), black.bitmap().size(), "Jaw variants must share bounds");

        for image in [background, black, white] {
            store.release(image);
        }
    }

    #[test]
    fn test_jaw_white_is_inside_mask() {
        let mut store = BundledAssets::new();
        let black = store.load(ResourceId::JawBlack);
        let white = store.load(ResourceId::JawWhite);

        for point in white.bitmap().bounds().points() {
            if white.bitmap().pixel(point) {
                assert!(black.bitmap().pixel(point), "Highlight at {point:?} falls outside the mask");
            }
        }
        assert!(white.bitmap().count_lit() < black.bitmap().count_lit());
    }

    #[test]
    fn test_mouth_cavity_is_unlit() {
        let mut store = BundledAssets::new();
        let background = store.load(ResourceId::Background);
        assert!(!background.bitmap().pixel(Point::new(TIME_X + 10, TIME_Y + 10)));
        assert!(background.bitmap().pixel(Point::new(72, 30)), "Forehead should be lit");
    }

    #[test]
    fn test_image_set_round_trip() {
        let mut store = BundledAssets::new();
        let images = ImageSet::load(&mut store);
        for id in ResourceId::ALL {
            assert_eq!(store.outstanding(id), 1, "{id:?} should be loaded once");
        }
        assert_eq!(images.get(ResourceId::JawBlack).size(), Size::new(JAW_WIDTH, JAW_HEIGHT));

        assert_eq!(images.release(&mut store), 3);
        for id in ResourceId::ALL {
            assert_eq!(store.outstanding(id), 0, "{id:?} should be released");
        }
        assert_eq!(store.loads(), store.releases());
    }

    #[test]
    fn test_handle_counting() {
        let mut store = BundledAssets::new();
        let image = store.load(ResourceId::JawWhite);
        assert_eq!(image.id(), ResourceId::JawWhite);
        assert_eq!(store.outstanding(ResourceId::JawWhite), 1);
        assert_eq!(store.outstanding(ResourceId::Background), 0);

        store.release(image);
        assert_eq!(store.outstanding(ResourceId::JawWhite), 0);
        assert_eq!(store.loads(), 1);
        assert_eq!(store.releases(), 1);
    }
}
