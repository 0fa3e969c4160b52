//! Task Watchdog Timer (TWDT) driver.
//!
//! Resets the board if the control loop stops feeding it, so a hung loop
//! cannot leave a door standing open or the cooler latched on.
//!
//! The loop calls [`Watchdog::feed`] once per tick.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

pub struct Watchdog {
    timeout_ms: u32,
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Configure the TWDT and subscribe the calling task.
    #[cfg(target_os = "espidf")]
    pub fn new(timeout_ms: u32) -> Self {
        // SAFETY: called once from the main task during bring-up.
        unsafe {
            let cfg = esp_task_wdt_config_t {
                timeout_ms,
                idle_core_mask: 0,
                trigger_panic: true,
            };
            let ret = esp_task_wdt_reconfigure(&cfg);
            if ret != ESP_OK {
                log::warn!("TWDT reconfigure returned {} (may already be configured)", ret);
            }

            let subscribed = esp_task_wdt_add(core::ptr::null_mut()) == ESP_OK;
            if subscribed {
                info!("Watchdog: subscribed ({}ms timeout)", timeout_ms);
            } else {
                log::warn!("Watchdog: failed to subscribe");
            }
            Self {
                timeout_ms,
                subscribed,
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(timeout_ms: u32) -> Self {
        info!("Watchdog(sim): {}ms, no-op", timeout_ms);
        Self { timeout_ms }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    #[cfg(target_os = "espidf")]
    pub fn feed(&self) {
        if self.subscribed {
            // SAFETY: the calling task subscribed in `new`.
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn feed(&self) {}
}
