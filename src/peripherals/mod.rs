pub(super) mod backlight;
pub(super) mod display;
pub(super) mod flash;
