//! Time keeping
//!
//! The nRF52832 has no battery-backed RTC, so wall-clock time is an anchor
//! (`TimeReference`) plus the monotonic uptime since that anchor. The boot
//! anchor comes from the UTC epoch baked in at build time.

use chrono::NaiveDateTime;
use embassy_time::Instant;

pub struct TimeReference {
    /// Clock time
    time: NaiveDateTime,
    /// Related system time
    instant: Instant,
}

impl Default for TimeReference {
    fn default() -> Self {
        Self {
            time: NaiveDateTime::UNIX_EPOCH,
            instant: Instant::from_ticks(0),
        }
    }
}

impl TimeReference {
    /// Create new time reference from NaiveDateTime
    pub fn from_datetime(time: NaiveDateTime) -> Self {
        Self {
            time,
            instant: Instant::now(),
        }
    }
}

pub struct TimeManager {
    reference: TimeReference,
}

impl TimeManager {
    /// Initialize time measurement on boot
    pub fn init() -> Self {
        Self {
            reference: TimeReference::default(),
        }
    }
    /// Get current time
    pub fn get_time(&self) -> NaiveDateTime {
        let now = Instant::now();
        NaiveDateTime::from_timestamp_micros(
            self.reference.time.timestamp_micros()
                + now.duration_since(self.reference.instant).as_micros() as i64,
        )
        .unwrap()
    }
    /// Update time reference
    pub fn set_time(&mut self, reference: TimeReference) {
        self.reference = reference;
    }
}
