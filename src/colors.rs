//! Color constants for the 1-bit watch display.
//!
//! The panel is monochrome, so every pixel is a [`BinaryColor`]. Naming the two
//! states keeps drawing code readable: `WHITE` is a lit pixel, `BLACK` is an
//! unlit one.
//!
//! The simulator maps these onto screen colors through
//! `BinaryColorTheme::Default` (lit pixels render white on a black window).

use embedded_graphics::pixelcolor::BinaryColor;

/// Unlit pixel. Used for the mouth cavity and the frame clear color.
pub const BLACK: BinaryColor = BinaryColor::Off;

/// Lit pixel. Used for the face, jaw highlight and the time text.
pub const WHITE: BinaryColor = BinaryColor::On;
