//! Weekly feeding trigger persisted per compartment.

use core::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::storage::Record;

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One weekly trigger: the door opens at `hour:minute` on `weekday`.
///
/// `weekday` counts from 1 = Sunday to 7 = Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub enabled: bool,
    pub minute: u8,
    pub hour: u8,
    pub weekday: u8,
}

impl ScheduleRecord {
    /// Build a record, clamping each field into its valid range.
    pub fn new(weekday: u8, hour: u8, minute: u8, enabled: bool) -> Self {
        Self {
            enabled,
            minute,
            hour,
            weekday,
        }
        .clamped()
    }

    /// Disarmed trigger at the current time of day and weekday.  Used when
    /// the stored record is unreadable.
    pub fn disabled_at(now: NaiveDateTime) -> Self {
        Self::new(
            weekday_of(now),
            now.hour() as u8,
            now.minute() as u8,
            false,
        )
    }

    pub fn clamped(self) -> Self {
        Self {
            enabled: self.enabled,
            minute: self.minute.min(59),
            hour: self.hour.min(23),
            weekday: self.weekday.clamp(1, 7),
        }
    }

    /// Whether `now` falls on the trigger's weekday.
    pub fn is_today(&self, now: NaiveDateTime) -> bool {
        weekday_of(now) == self.weekday
    }

    /// The trigger instant on `now`'s calendar date.
    pub fn open_at(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        now.date()
            .and_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
    }

    pub fn weekday_name(&self) -> &'static str {
        WEEKDAY_NAMES[usize::from(self.weekday.clamp(1, 7) - 1)]
    }
}

/// Day of week of `now`, 1 = Sunday.
pub fn weekday_of(now: NaiveDateTime) -> u8 {
    now.weekday().number_from_sunday() as u8
}

impl fmt::Display for ScheduleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:02}:{:02}",
            if self.enabled { "ENABLED" } else { "DISABLED" },
            self.weekday_name(),
            self.hour,
            self.minute
        )
    }
}

impl Record for ScheduleRecord {
    const VERSION: u8 = 1;
    const FIELDS_LEN: usize = 4;

    fn encode_fields(&self, out: &mut [u8]) {
        out[0] = u8::from(self.enabled);
        out[1] = self.minute;
        out[2] = self.hour;
        out[3] = self.weekday;
    }

    fn decode_fields(bytes: &[u8]) -> Self {
        Self {
            enabled: bytes[0] != 0,
            minute: bytes[1],
            hour: bytes[2],
            weekday: bytes[3],
        }
        .clamped()
    }
}
