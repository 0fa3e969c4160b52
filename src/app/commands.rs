//! Inbound commands to the feeder service.
//!
//! These represent actions requested by the outside world (front-panel
//! buttons, serial console) that the
//! [`FeederService`](super::service::FeederService) routes to the right
//! component.

use crate::door::DoorId;

/// Commands that external adapters can send into the feeder core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Arm a compartment's weekly trigger (one feeding).
    EnableDoor(DoorId),

    /// Disarm a compartment's trigger.
    DisableDoor(DoorId),

    /// Change a compartment's trigger time.  Out-of-range fields are clamped.
    SetSchedule {
        door: DoorId,
        weekday: u8,
        hour: u8,
        minute: u8,
    },

    /// Change and persist the cooler setpoint (°F).
    SetThermostat(i16),

    EnableCooler,

    DisableCooler,
}
