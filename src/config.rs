//! System configuration parameters
//!
//! Mechanical and timing parameters for the feeder.  These are build-time
//! defaults; the weekly schedules and the cooler setpoint live in the
//! persistent store instead (see [`crate::storage::layout`]).

use serde::{Deserialize, Serialize};

use crate::door::motion::MAX_SERVO_DEG;
use crate::error::Error;
use crate::storage::layout::DOOR_COUNT;

/// Servo angles for one compartment door.
///
/// The two doors are mounted mirror-image, so "closed" is not the same
/// angle on both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorProfile {
    pub closed_deg: u16,
    pub open_deg: u16,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Doors ---
    /// Servo angles, indexed by door (door 1 first).
    pub doors: [DoorProfile; DOOR_COUNT],

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Status report interval (seconds)
    pub status_interval_secs: u32,
    /// Task watchdog timeout (milliseconds)
    pub watchdog_timeout_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            doors: [
                DoorProfile {
                    closed_deg: 0,
                    open_deg: 90,
                },
                DoorProfile {
                    closed_deg: 90,
                    open_deg: 0,
                },
            ],
            control_loop_interval_ms: 50, // 20 Hz, smooth servo sweeps
            status_interval_secs: 60,     // 1/min
            watchdog_timeout_ms: 10_000,
        }
    }
}

impl SystemConfig {
    /// Reject configurations the hardware cannot honour.
    pub fn validate(&self) -> Result<(), Error> {
        for profile in &self.doors {
            if profile.closed_deg > MAX_SERVO_DEG || profile.open_deg > MAX_SERVO_DEG {
                return Err(Error::Config("door angle exceeds servo range"));
            }
            if profile.closed_deg == profile.open_deg {
                return Err(Error::Config("door open and closed angles are equal"));
            }
        }
        if !(10..=5000).contains(&self.control_loop_interval_ms) {
            return Err(Error::Config("control loop interval out of range"));
        }
        if !(5..=3600).contains(&self.status_interval_secs) {
            return Err(Error::Config("status interval out of range"));
        }
        if self.watchdog_timeout_ms < self.control_loop_interval_ms.saturating_mul(4) {
            return Err(Error::Config("watchdog timeout shorter than four control ticks"));
        }
        Ok(())
    }
}
