//! Image resource identifiers and the loader seam
//!
//! The assets themselves (1-bpp, row-major, MSB first) live wherever the
//! platform keeps them; on the watch that is the external SPI NOR flash.
//! This module only fixes the identifiers, the pixel dimensions and the
//! application metadata.

/// Width of the twelve hour images in pixels (full screen).
pub const HOUR_IMAGE_W: u32 = 240;
/// Height of the twelve hour images in pixels (full screen).
pub const HOUR_IMAGE_H: u32 = 240;
/// Width of the two hand overlay images in pixels.
pub const HAND_IMAGE_W: u32 = 40;
/// Height of the two hand overlay images in pixels.
pub const HAND_IMAGE_H: u32 = 200;

/// Packed byte length of an hour image.
pub const HOUR_IMAGE_BYTES: usize = row_bytes(HOUR_IMAGE_W) * HOUR_IMAGE_H as usize;
/// Packed byte length of a hand overlay image.
pub const HAND_IMAGE_BYTES: usize = row_bytes(HAND_IMAGE_W) * HAND_IMAGE_H as usize;

const fn row_bytes(width: u32) -> usize {
    (width as usize + 7) / 8
}

/// Identifier of one packaged image asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResourceId {
    Hour1,
    Hour2,
    Hour3,
    Hour4,
    Hour5,
    Hour6,
    Hour7,
    Hour8,
    Hour9,
    Hour10,
    Hour11,
    Hour12,
    HandWhite,
    HandBlack,
}

impl ResourceId {
    /// Pixel dimensions of the asset.
    pub const fn dimensions(self) -> (u32, u32) {
        match self {
            ResourceId::HandWhite | ResourceId::HandBlack => (HAND_IMAGE_W, HAND_IMAGE_H),
            _ => (HOUR_IMAGE_W, HOUR_IMAGE_H),
        }
    }

    /// Packed byte length of the asset.
    pub const fn byte_len(self) -> usize {
        let (w, h) = self.dimensions();
        row_bytes(w) * h as usize
    }
}

/// The hour image table: index 0 holds the image for hour 1, index 11 the
/// image for hour 12 (which also serves hour 0).
pub const HOUR_IMAGES: [ResourceId; 12] = [
    ResourceId::Hour1,
    ResourceId::Hour2,
    ResourceId::Hour3,
    ResourceId::Hour4,
    ResourceId::Hour5,
    ResourceId::Hour6,
    ResourceId::Hour7,
    ResourceId::Hour8,
    ResourceId::Hour9,
    ResourceId::Hour10,
    ResourceId::Hour11,
    ResourceId::Hour12,
];

/// Resolves a [`ResourceId`] to pixel data.
///
/// `buf` is always exactly [`ResourceId::byte_len`] bytes long.
pub trait ResourceLoader {
    type Error;

    fn load(&mut self, id: ResourceId, buf: &mut [u8]) -> Result<(), Self::Error>;
}

/// Application identity registered with the platform at startup.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AppInfo {
    pub uuid: [u8; 16],
    pub name: &'static str,
    pub author: &'static str,
    pub version: (u8, u8),
    pub category: &'static str,
}

pub const APP_INFO: AppInfo = AppInfo {
    uuid: [
        0x9d, 0xd8, 0x89, 0x5c, 0xc4, 0xa4, 0x4c, 0x4d, //
        0x97, 0xec, 0x1a, 0xa6, 0xf2, 0x80, 0x5b, 0x72,
    ],
    name: "Daisy Clock",
    author: "Bit Hangar",
    version: (1, 1),
    category: "watchface",
};
