//! Rotated hand overlays
//!
//! The ladybug hand ships as two masks of the same artwork: the white part
//! and the black part. Drawn one after the other with complementary blend
//! modes onto the 1-bpp frame they composite into one "transparent" image,
//! which is much cheaper than a real alpha path on this class of hardware.

use embedded_graphics::geometry::Point;
use libm::{cosf, roundf, sinf, sqrtf};

use crate::framebuffer::{Bitmap, FrameBuffer};
use crate::resources::{ResourceId, ResourceLoader, HAND_IMAGE_BYTES, HAND_IMAGE_H, HAND_IMAGE_W};

/// How a mask combines with pixels already in the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlendMode {
    /// Set masked pixels to white.
    Or,
    /// Set masked pixels to black.
    Clear,
}

/// One hand overlay: a 1-bpp mask rotated about a pivot and blended onto
/// the frame at a fixed screen anchor.
pub struct HandSprite {
    mask: [u8; HAND_IMAGE_BYTES],
    /// Rotation center within the mask.
    pivot: Point,
    /// Screen position the pivot maps to.
    anchor: Point,
    blend: BlendMode,
    angle: i32,
}

impl HandSprite {
    pub fn new(blend: BlendMode, anchor: Point, pivot: Point) -> Self {
        Self {
            mask: [0; HAND_IMAGE_BYTES],
            pivot,
            anchor,
            blend,
            angle: 0,
        }
    }

    /// Fetch the mask pixels from the platform.
    pub fn load<L: ResourceLoader>(&mut self, loader: &mut L, id: ResourceId) -> Result<(), L::Error> {
        loader.load(id, &mut self.mask)
    }

    /// Current rotation in degrees, clockwise from twelve o'clock.
    pub fn angle(&self) -> i32 {
        self.angle
    }

    pub fn set_angle(&mut self, degrees: i32) {
        self.angle = degrees;
    }

    pub fn blend(&self) -> BlendMode {
        self.blend
    }

    /// Render the rotated mask onto the frame.
    ///
    /// Walks the destination square that circumscribes every possible
    /// rotation and maps each pixel back into the mask (nearest neighbour),
    /// so rotated output has no holes.
    pub fn blit(&self, fb: &mut FrameBuffer) {
        let mask = Bitmap::new(&self.mask, HAND_IMAGE_W, HAND_IMAGE_H);

        let rad = self.angle as f32 * core::f32::consts::PI / 180.0;
        let (sin, cos) = (sinf(rad), cosf(rad));

        let reach = self.reach();
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let fx = dx as f32;
                let fy = dy as f32;
                let sx = roundf(cos * fx + sin * fy) as i32 + self.pivot.x;
                let sy = roundf(cos * fy - sin * fx) as i32 + self.pivot.y;
                if mask.pixel(sx, sy) {
                    let x = self.anchor.x + dx;
                    let y = self.anchor.y + dy;
                    match self.blend {
                        BlendMode::Or => fb.set(x, y),
                        BlendMode::Clear => fb.clear(x, y),
                    }
                }
            }
        }
    }

    /// Largest pivot-to-corner distance, rounded up.
    fn reach(&self) -> i32 {
        let rx = self.pivot.x.max(HAND_IMAGE_W as i32 - 1 - self.pivot.x) as f32;
        let ry = self.pivot.y.max(HAND_IMAGE_H as i32 - 1 - self.pivot.y) as f32;
        sqrtf(rx * rx + ry * ry) as i32 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Loader that hands out a fixed mask for any id.
    struct MaskLoader<'a>(&'a [u8; HAND_IMAGE_BYTES]);

    impl ResourceLoader for MaskLoader<'_> {
        type Error = core::convert::Infallible;

        fn load(&mut self, _id: ResourceId, buf: &mut [u8]) -> Result<(), Self::Error> {
            buf.copy_from_slice(self.0);
            Ok(())
        }
    }

    const PIVOT: Point = Point::new(20, 100);
    const ANCHOR: Point = Point::new(120, 120);

    fn sprite_with_bit(blend: BlendMode, x: usize, y: usize) -> HandSprite {
        let mut mask = [0u8; HAND_IMAGE_BYTES];
        mask[y * 5 + x / 8] |= 0x80 >> (x % 8);
        let mut sprite = HandSprite::new(blend, ANCHOR, PIVOT);
        sprite
            .load(&mut MaskLoader(&mask), ResourceId::HandWhite)
            .unwrap();
        sprite
    }

    #[test]
    fn zero_rotation_maps_pivot_offset_straight_to_anchor() {
        // One pixel 10 rows above the pivot.
        let sprite = sprite_with_bit(BlendMode::Or, 20, 90);
        let mut fb = FrameBuffer::new();
        sprite.blit(&mut fb);
        assert!(fb.get(ANCHOR.x, ANCHOR.y - 10));
        assert!(!fb.get(ANCHOR.x, ANCHOR.y + 10));
    }

    #[test]
    fn quarter_turn_rotates_clockwise() {
        let mut sprite = sprite_with_bit(BlendMode::Or, 20, 90);
        sprite.set_angle(90);
        let mut fb = FrameBuffer::new();
        sprite.blit(&mut fb);
        // "Up" rotates to "right" on a y-down screen.
        assert!(fb.get(ANCHOR.x + 10, ANCHOR.y));
        assert!(!fb.get(ANCHOR.x, ANCHOR.y - 10));
    }

    #[test]
    fn half_turn_mirrors_through_the_pivot() {
        let mut sprite = sprite_with_bit(BlendMode::Or, 20, 90);
        sprite.set_angle(180);
        let mut fb = FrameBuffer::new();
        sprite.blit(&mut fb);
        assert!(fb.get(ANCHOR.x, ANCHOR.y + 10));
    }

    #[test]
    fn sprites_keep_their_blend_configuration() {
        assert_eq!(
            sprite_with_bit(BlendMode::Or, 20, 90).blend(),
            BlendMode::Or
        );
        assert_eq!(
            sprite_with_bit(BlendMode::Clear, 20, 90).blend(),
            BlendMode::Clear
        );
    }

    #[test]
    fn clear_blend_punches_black_pixels() {
        let sprite = sprite_with_bit(BlendMode::Clear, 20, 90);
        let mut fb = FrameBuffer::new();
        for dx in -2..=2 {
            fb.set(ANCHOR.x + dx, ANCHOR.y - 10);
        }
        sprite.blit(&mut fb);
        assert!(!fb.get(ANCHOR.x, ANCHOR.y - 10));
        assert!(fb.get(ANCHOR.x - 2, ANCHOR.y - 10));
        assert!(fb.get(ANCHOR.x + 2, ANCHOR.y - 10));
    }

    #[test]
    fn pixels_outside_the_mask_are_untouched() {
        let sprite = sprite_with_bit(BlendMode::Or, 20, 90);
        let mut fb = FrameBuffer::new();
        sprite.blit(&mut fb);
        let lit = fb.pixels().filter(|px| {
            use embedded_graphics::prelude::RgbColor;
            *px == embedded_graphics::pixelcolor::Rgb565::WHITE
        });
        // Nearest-neighbour inverse mapping may land several destination
        // pixels on the single source pixel, but only right at the anchor
        // offset.
        assert!(lit.count() <= 4);
    }
}
