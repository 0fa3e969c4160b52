//! ESP32 time adapter.
//!
//! Implements [`Clock`] for the feeder.
//!
//! - **`target_os = "espidf"`**: the monotonic counter wraps
//!   `esp_timer_get_time()`; the wall clock comes from
//!   `gettimeofday()` + `localtime_r()`, i.e. whatever the RTC/SNTP last set.
//! - **`not(target_os = "espidf")`**: `std::time` for host-side simulation.
//!   The wall clock is UTC.

use chrono::NaiveDateTime;

use crate::app::ports::Clock;

/// Time adapter for the ESP32-S3 platform.
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since boot (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    /// Local broken-down time, or `None` if the C library refuses.
    #[cfg(target_os = "espidf")]
    fn local_time(&self) -> Option<NaiveDateTime> {
        use chrono::NaiveDate;
        use core::ptr;

        let mut tv = esp_idf_svc::sys::timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, ptr::null_mut()) } != 0 {
            return None;
        }
        let secs = tv.tv_sec as esp_idf_svc::sys::time_t;
        let mut tm: esp_idf_svc::sys::tm = unsafe { core::mem::zeroed() };
        if unsafe { esp_idf_svc::sys::localtime_r(&secs, &mut tm) }.is_null() {
            return None;
        }
        NaiveDate::from_ymd_opt(tm.tm_year + 1900, (tm.tm_mon + 1) as u32, tm.tm_mday as u32)?
            .and_hms_opt(tm.tm_hour as u32, tm.tm_min as u32, tm.tm_sec.min(59) as u32)
    }
}

impl Clock for Esp32TimeAdapter {
    #[cfg(target_os = "espidf")]
    fn now(&self) -> NaiveDateTime {
        // An unset RTC reads as 1970-01-01 00:00.
        self.local_time().unwrap_or_default()
    }

    #[cfg(not(target_os = "espidf"))]
    fn now(&self) -> NaiveDateTime {
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_secs() as i64);
        chrono::DateTime::from_timestamp(secs, 0)
            .map(|dt| dt.naive_utc())
            .unwrap_or_default()
    }

    fn monotonic_ms(&self) -> u32 {
        // Truncation to u32 is the wrap the domain expects.
        (self.uptime_us() / 1_000) as u32
    }
}
