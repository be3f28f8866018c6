//! Owned 1-bit bitmaps and compositing.
//!
//! A [`Bitmap`] stores one bit per pixel, rows packed MSB-first and padded to
//! whole bytes (the same layout `ImageRaw<BinaryColor>` expects). It is both a
//! pixel source for layers and a [`DrawTarget`], so assets and whole frames are
//! drawn with ordinary `embedded-graphics` primitives.
//!
//! # Compositing
//!
//! Layers are blitted onto the frame with a [`CompositingMode`]:
//!
//! | Mode | Result where source bit is set | Where source bit is clear |
//! |------|--------------------------------|---------------------------|
//! | `Assign` | lit | unlit |
//! | `Clear` | unlit (masked out) | unchanged |
//! | `Or` | lit | unchanged |
//!
//! The jaw uses `Clear` for its black bitmap and `Or` for its white one, which
//! together produce a two-tone sprite from two single-color sources.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Blend rule used when drawing a bitmap over the frame.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum CompositingMode {
    /// Copy source pixels as they are.
    #[default]
    Assign,
    /// Clear destination pixels wherever the source is lit.
    Clear,
    /// Light destination pixels wherever the source is lit.
    Or,
}

impl CompositingMode {
    /// Combine one source pixel with one destination pixel.
    #[inline]
    pub const fn blend(self, src: bool, dst: bool) -> bool {
        match self {
            Self::Assign => src,
            Self::Clear => dst && !src,
            Self::Or => dst || src,
        }
    }
}

/// Row-packed 1-bit image.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Bitmap {
    size: Size,
    stride: usize,
    data: Vec<u8>,
}

impl Bitmap {
    /// Create a bitmap with every pixel unlit.
    pub fn new(size: Size) -> Self {
        let stride = (size.width as usize).div_ceil(8);
        Self {
            size,
            stride,
            data: vec![0; stride * size.height as usize],
        }
    }

    /// Native bounds of the image, anchored at the origin.
    #[inline]
    pub const fn bounds(&self) -> Rectangle { Rectangle::new(Point::zero(), self.size) }

    /// Raw packed rows (MSB-first, `ceil(width / 8)` bytes per row).
    #[inline]
    pub fn data(&self) -> &[u8] { &self.data }

    #[inline]
    fn index(&self, point: Point) -> Option<(usize, u8)> {
        if point.x < 0 || point.y < 0 || point.x >= self.size.width as i32 || point.y >= self.size.height as i32 {
            return None;
        }
        let x = point.x as usize;
        let y = point.y as usize;
        Some((y * self.stride + x / 8, 0x80 >> (x % 8)))
    }

    /// Read one pixel. Out-of-bounds points read as unlit.
    #[inline]
    pub fn pixel(&self, point: Point) -> bool {
        self.index(point).is_some_and(|(byte, mask)| self.data[byte] & mask != 0)
    }

    /// Write one pixel. Out-of-bounds points are ignored.
    #[inline]
    pub fn set_pixel(&mut self, point: Point, on: bool) {
        if let Some((byte, mask)) = self.index(point) {
            if on {
                self.data[byte] |= mask;
            } else {
                self.data[byte] &= !mask;
            }
        }
    }

    /// Number of lit pixels.
    pub fn count_lit(&self) -> u32 { self.data.iter().map(|b| b.count_ones()).sum() }

    /// Blit `src` with its top-left at `origin`, blending with `mode`.
    ///
    /// Pixels falling outside this bitmap are clipped.
    pub fn composite(&mut self, src: &Self, origin: Point, mode: CompositingMode) {
        for y in 0..src.size.height as i32 {
            for x in 0..src.size.width as i32 {
                let src_point = Point::new(x, y);
                let dst_point = origin + src_point;
                if self.index(dst_point).is_none() {
                    continue;
                }
                let blended = mode.blend(src.pixel(src_point), self.pixel(dst_point));
                self.set_pixel(dst_point, blended);
            }
        }
    }

    /// Pixels of this bitmap as `embedded-graphics` pixels, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel<BinaryColor>> + '_ {
        self.bounds()
            .points()
            .map(|p| Pixel(p, BinaryColor::from(self.pixel(p))))
    }
}

impl OriginDimensions for Bitmap {
    fn size(&self) -> Size { self.size }
}

impl DrawTarget for Bitmap {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point, color.is_on());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = if color.is_on() { 0xFF } else { 0x00 };
        self.data.fill(fill);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::primitives::PrimitiveStyle;

    use super::*;

    #[test]
    fn test_new_is_blank() {
        let bitmap = Bitmap::new(Size::new(13, 5));
        assert_eq!(bitmap.count_lit(), 0);
        assert_eq!(bitmap.data().len(), 2 * 5, "13 px wide pads to 2 bytes per row");
        assert_eq!(bitmap.bounds(), Rectangle::new(Point::zero(), Size::new(13, 5)));
    }

    #[test]
    fn test_set_and_read_pixel() {
        let mut bitmap = Bitmap::new(Size::new(10, 10));
        bitmap.set_pixel(Point::new(9, 3), true);
        assert!(bitmap.pixel(Point::new(9, 3)));
        assert!(!bitmap.pixel(Point::new(8, 3)));
        bitmap.set_pixel(Point::new(9, 3), false);
        assert!(!bitmap.pixel(Point::new(9, 3)));
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut bitmap = Bitmap::new(Size::new(4, 4));
        bitmap.set_pixel(Point::new(-1, 0), true);
        bitmap.set_pixel(Point::new(4, 0), true);
        assert_eq!(bitmap.count_lit(), 0);
        assert!(!bitmap.pixel(Point::new(100, 100)));
    }

    #[test]
    fn test_draw_target_fill() {
        let mut bitmap = Bitmap::new(Size::new(8, 8));
        Rectangle::new(Point::new(2, 2), Size::new(3, 3))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut bitmap)
            .unwrap();
        assert_eq!(bitmap.count_lit(), 9);
    }

    #[test]
    fn test_clear_fills_whole_bitmap() {
        let mut bitmap = Bitmap::new(Size::new(8, 2));
        bitmap.clear(BinaryColor::On).unwrap();
        assert_eq!(bitmap.count_lit(), 16);
    }

    #[test]
    fn test_blend_table() {
        use CompositingMode::{Assign, Clear, Or};
        assert!(!Clear.blend(true, true), "Clear masks lit source");
        assert!(Clear.blend(false, true), "Clear keeps destination under unlit source");
        assert!(Or.blend(true, false));
        assert!(Or.blend(false, true));
        assert!(!Or.blend(false, false));
        assert!(!Assign.blend(false, true));
    }

    #[test]
    fn test_composite_clear_then_or() {
        // White destination, 4x4 source fully lit cleared into the middle
        let mut frame = Bitmap::new(Size::new(8, 8));
        frame.clear(BinaryColor::On).unwrap();

        let mut mask = Bitmap::new(Size::new(4, 4));
        mask.clear(BinaryColor::On).unwrap();
        frame.composite(&mask, Point::new(2, 2), CompositingMode::Clear);
        assert_eq!(frame.count_lit(), 64 - 16);

        let mut highlight = Bitmap::new(Size::new(4, 4));
        highlight.set_pixel(Point::new(0, 0), true);
        frame.composite(&highlight, Point::new(2, 2), CompositingMode::Or);
        assert_eq!(frame.count_lit(), 64 - 15);
        assert!(frame.pixel(Point::new(2, 2)));
    }

    #[test]
    fn test_composite_clips() {
        let mut frame = Bitmap::new(Size::new(4, 4));
        let mut src = Bitmap::new(Size::new(4, 4));
        src.clear(BinaryColor::On).unwrap();
        frame.composite(&src, Point::new(2, 2), CompositingMode::Or);
        assert_eq!(frame.count_lit(), 4, "Only the overlapping 2x2 corner is drawn");
    }
}
