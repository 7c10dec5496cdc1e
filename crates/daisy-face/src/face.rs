//! Hour selection and the per-minute update pass

use chrono::{NaiveDateTime, Timelike};
use embedded_graphics::geometry::Point;

use crate::framebuffer::{Bitmap, FrameBuffer};
use crate::resources::{
    ResourceId, ResourceLoader, HOUR_IMAGES, HOUR_IMAGE_BYTES, HOUR_IMAGE_H, HOUR_IMAGE_W,
};
use crate::sprite::{BlendMode, HandSprite};

/// Screen position the hand pivot maps to (display center).
const HAND_ANCHOR: Point = Point::new(120, 120);
/// Rotation center within the hand masks.
const HAND_PIVOT: Point = Point::new(20, 100);

/// Index into the hour image table, 0..=11.
///
/// Slot 0 shows the "1" image; slot 11 shows the "12" image and also serves
/// hour 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HourSlot(u8);

impl HourSlot {
    /// Total mapping from an hour of day (0..=23) to its table slot.
    pub fn from_hour24(hour: u32) -> Self {
        match hour % 12 {
            0 => HourSlot(11),
            reduced => HourSlot(reduced as u8 - 1),
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The packaged image shown for this slot.
    pub fn resource(self) -> ResourceId {
        HOUR_IMAGES[self.index()]
    }
}

/// Rotation for the minute hand: 0..=59 minutes onto a full turn.
pub fn minute_angle(minute: u32) -> i32 {
    (minute * 6) as i32
}

/// The watchface: current hour image plus the two ladybug overlays,
/// composited into a ready-to-push frame.
pub struct DaisyFace {
    hour_image: [u8; HOUR_IMAGE_BYTES],
    current: HourSlot,
    hand_white: HandSprite,
    hand_black: HandSprite,
    frame: FrameBuffer,
}

impl DaisyFace {
    /// Acquire the initial resources: the hour-12 image (shown until the
    /// first update pass) and both hand masks.
    pub fn new<L: ResourceLoader>(loader: &mut L) -> Result<Self, L::Error> {
        let current = HourSlot::from_hour24(12);

        let mut hour_image = [0; HOUR_IMAGE_BYTES];
        loader.load(current.resource(), &mut hour_image)?;

        let mut hand_white = HandSprite::new(BlendMode::Or, HAND_ANCHOR, HAND_PIVOT);
        hand_white.load(loader, ResourceId::HandWhite)?;

        let mut hand_black = HandSprite::new(BlendMode::Clear, HAND_ANCHOR, HAND_PIVOT);
        hand_black.load(loader, ResourceId::HandBlack)?;

        let mut face = Self {
            hour_image,
            current,
            hand_white,
            hand_black,
            frame: FrameBuffer::new(),
        };
        face.compose();
        Ok(face)
    }

    /// One tick pass: swap the hour image if the slot changed, point both
    /// overlays at the current minute, recompose the frame.
    ///
    /// Returns whether the hour image was replaced.
    pub fn update<L: ResourceLoader>(
        &mut self,
        loader: &mut L,
        time: NaiveDateTime,
    ) -> Result<bool, L::Error> {
        let slot = HourSlot::from_hour24(time.hour());
        let swapped = slot != self.current;
        if swapped {
            // Release-old/acquire-new collapses to overwriting the one
            // live hour buffer.
            loader.load(slot.resource(), &mut self.hour_image)?;
            self.current = slot;
        }

        let angle = minute_angle(time.minute());
        self.hand_white.set_angle(angle);
        self.hand_black.set_angle(angle);

        self.compose();
        Ok(swapped)
    }

    /// The composed frame for the most recent pass.
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Slot currently on screen.
    pub fn current_slot(&self) -> HourSlot {
        self.current
    }

    /// Rotation of the white and black overlays.
    pub fn overlay_angles(&self) -> (i32, i32) {
        (self.hand_white.angle(), self.hand_black.angle())
    }

    fn compose(&mut self) {
        self.frame
            .fill_from(Bitmap::new(&self.hour_image, HOUR_IMAGE_W, HOUR_IMAGE_H));
        self.hand_white.blit(&mut self.frame);
        self.hand_black.blit(&mut self.frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// In-memory loader that counts how often each asset class is fetched.
    struct CountingLoader {
        hour_loads: usize,
        hand_loads: usize,
    }

    impl CountingLoader {
        fn new() -> Self {
            Self {
                hour_loads: 0,
                hand_loads: 0,
            }
        }
    }

    impl ResourceLoader for CountingLoader {
        type Error = core::convert::Infallible;

        fn load(&mut self, id: ResourceId, buf: &mut [u8]) -> Result<(), Self::Error> {
            match id {
                ResourceId::HandWhite | ResourceId::HandBlack => self.hand_loads += 1,
                _ => self.hour_loads += 1,
            }
            buf.fill(0);
            Ok(())
        }
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2013, 4, 2)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn slot_mapping_covers_every_hour_of_day() {
        for hour in 0..24 {
            let expected = match hour % 12 {
                0 => 11,
                reduced => reduced as usize - 1,
            };
            assert_eq!(HourSlot::from_hour24(hour).index(), expected, "hour {hour}");
        }
    }

    #[test]
    fn midnight_shows_the_twelve_image() {
        assert_eq!(HourSlot::from_hour24(0).index(), 11);
        assert_eq!(HourSlot::from_hour24(0).resource(), ResourceId::Hour12);
    }

    #[test]
    fn afternoon_hours_wrap() {
        assert_eq!(HourSlot::from_hour24(13).index(), 0);
        assert_eq!(HourSlot::from_hour24(13).resource(), ResourceId::Hour1);
        assert_eq!(HourSlot::from_hour24(23).index(), 10);
        assert_eq!(HourSlot::from_hour24(23).resource(), ResourceId::Hour11);
    }

    #[test]
    fn angle_is_six_degrees_per_minute() {
        for minute in 0..60 {
            let angle = minute_angle(minute);
            assert_eq!(angle, minute as i32 * 6);
            assert!((0..=354).contains(&angle));
        }
        assert_eq!(minute_angle(0), 0);
        assert_eq!(minute_angle(30), 180);
        assert_eq!(minute_angle(59), 354);
    }

    #[test]
    fn startup_acquires_the_twelve_image_and_both_hands() {
        let mut loader = CountingLoader::new();
        let face = DaisyFace::new(&mut loader).unwrap();
        assert_eq!(loader.hour_loads, 1);
        assert_eq!(loader.hand_loads, 2);
        assert_eq!(face.current_slot(), HourSlot::from_hour24(12));
    }

    #[test]
    fn update_points_both_overlays_at_the_minute() {
        let mut loader = CountingLoader::new();
        let mut face = DaisyFace::new(&mut loader).unwrap();
        face.update(&mut loader, at(9, 41)).unwrap();
        let (white, black) = face.overlay_angles();
        assert_eq!(white, 41 * 6);
        assert_eq!(white, black);
    }

    #[test]
    fn hour_image_is_only_swapped_when_the_slot_changes() {
        let mut loader = CountingLoader::new();
        let mut face = DaisyFace::new(&mut loader).unwrap();

        // First pass after startup: hour 9 differs from the initial 12.
        assert!(face.update(&mut loader, at(9, 0)).unwrap());
        assert_eq!(loader.hour_loads, 2);

        // Same time again: no further acquisition.
        assert!(!face.update(&mut loader, at(9, 0)).unwrap());
        assert_eq!(loader.hour_loads, 2);

        // Minutes advance within the hour: still no swap.
        assert!(!face.update(&mut loader, at(9, 59)).unwrap());
        assert_eq!(loader.hour_loads, 2);

        // Hour rolls over: exactly one more load.
        assert!(face.update(&mut loader, at(10, 0)).unwrap());
        assert_eq!(loader.hour_loads, 3);
    }

    #[test]
    fn noon_and_midnight_share_a_slot() {
        let mut loader = CountingLoader::new();
        let mut face = DaisyFace::new(&mut loader).unwrap();
        face.update(&mut loader, at(12, 0)).unwrap();
        let loads = loader.hour_loads;
        face.update(&mut loader, at(0, 0)).unwrap();
        assert_eq!(loader.hour_loads, loads);
    }

    #[test]
    fn overlay_angles_match_after_every_pass() {
        let mut loader = CountingLoader::new();
        let mut face = DaisyFace::new(&mut loader).unwrap();
        for minute in [0, 7, 15, 30, 44, 59] {
            face.update(&mut loader, at(3, minute)).unwrap();
            let (white, black) = face.overlay_angles();
            assert_eq!(white, black);
            assert_eq!(white, minute_angle(minute));
        }
    }
}
