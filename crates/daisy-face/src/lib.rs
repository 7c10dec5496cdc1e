//! Daisy Clock watchface core
//!
//! Target-independent logic for the Daisy Clock watchface: a daisy bitmap
//! for the current hour, and a ladybug that circles it once per hour. The
//! platform side (display, flash, tick source) stays in the firmware crate;
//! everything here only needs a [`resources::ResourceLoader`] to pull pixel
//! data from.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod face;
pub mod framebuffer;
pub mod resources;
pub mod sprite;

pub use face::{minute_angle, DaisyFace, HourSlot};
pub use framebuffer::FrameBuffer;
pub use resources::{AppInfo, ResourceId, ResourceLoader, APP_INFO};
