//! 1-bpp composition surface
//!
//! The watch LCD is RGB565, but the face art is monochrome, so composition
//! happens on a packed 1-bpp buffer (set bit = white) and the result is
//! expanded to [`Rgb565`] only when pushed to the display.

use embedded_graphics::{
    geometry::{Point, Size},
    pixelcolor::Rgb565,
    prelude::RgbColor,
    primitives::Rectangle,
};

/// Screen width in pixels.
pub const WIDTH: u32 = 240;
/// Screen height in pixels.
pub const HEIGHT: u32 = 240;
/// Packed bytes per row.
pub const ROW_BYTES: usize = (WIDTH as usize + 7) / 8;
/// Packed byte length of the whole frame.
pub const FRAME_BYTES: usize = ROW_BYTES * HEIGHT as usize;

/// The full-screen area, for `fill_contiguous` on the display driver.
pub const AREA: Rectangle = Rectangle::new(Point::zero(), Size::new(WIDTH, HEIGHT));

/// Borrowed view of a packed 1-bpp image, row-major, MSB first.
#[derive(Clone, Copy)]
pub struct Bitmap<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> Bitmap<'a> {
    /// `data` must hold `ceil(width / 8) * height` bytes.
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Self {
        debug_assert_eq!(data.len(), (width as usize + 7) / 8 * height as usize);
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel state at (x, y); out-of-range coordinates read as unset.
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return false;
        }
        let row = (self.width as usize + 7) / 8;
        let byte = self.data[y as usize * row + x as usize / 8];
        byte & (0x80 >> (x as usize % 8)) != 0
    }
}

/// Packed 1-bpp frame buffer covering the whole screen.
pub struct FrameBuffer {
    bits: [u8; FRAME_BYTES],
}

impl FrameBuffer {
    /// All-black frame.
    pub const fn new() -> Self {
        Self {
            bits: [0; FRAME_BYTES],
        }
    }

    /// Set the pixel at (x, y) to white. Out-of-range writes are dropped.
    pub fn set(&mut self, x: i32, y: i32) {
        if let Some((byte, mask)) = Self::locate(x, y) {
            self.bits[byte] |= mask;
        }
    }

    /// Set the pixel at (x, y) to black. Out-of-range writes are dropped.
    pub fn clear(&mut self, x: i32, y: i32) {
        if let Some((byte, mask)) = Self::locate(x, y) {
            self.bits[byte] &= !mask;
        }
    }

    /// Pixel state at (x, y); out-of-range coordinates read as black.
    pub fn get(&self, x: i32, y: i32) -> bool {
        match Self::locate(x, y) {
            Some((byte, mask)) => self.bits[byte] & mask != 0,
            None => false,
        }
    }

    /// Replace the whole frame with a full-screen bitmap.
    pub fn fill_from(&mut self, image: Bitmap<'_>) {
        debug_assert_eq!(image.width(), WIDTH);
        debug_assert_eq!(image.height(), HEIGHT);
        self.bits.copy_from_slice(image.data);
    }

    /// Expand the frame into the display's pixel format, row-major.
    pub fn pixels(&self) -> impl Iterator<Item = Rgb565> + '_ {
        self.bits.iter().flat_map(|byte| {
            (0..8).map(move |bit| {
                if byte & (0x80 >> bit) != 0 {
                    Rgb565::WHITE
                } else {
                    Rgb565::BLACK
                }
            })
        })
    }

    fn locate(x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x as u32 >= WIDTH || y as u32 >= HEIGHT {
            return None;
        }
        let byte = y as usize * ROW_BYTES + x as usize / 8;
        Some((byte, 0x80 >> (x as usize % 8)))
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
