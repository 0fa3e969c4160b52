//! Outbound application events.
//!
//! Components emit these through the [`EventSink`](super::ports::EventSink)
//! port.  Adapters on the other side decide what to do with them, e.g. log
//! them to the serial console.

use serde::Serialize;

use crate::door::schedule::ScheduleRecord;
use crate::door::{DoorId, DoorPhase};
use crate::storage::LoadError;

/// How a persisted record was obtained at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The stored record passed its integrity check.
    Restored,
    /// The slot was unreadable; defaults were substituted and written back.
    Defaulted(LoadError),
}

impl LoadOutcome {
    pub fn is_restored(&self) -> bool {
        matches!(self, Self::Restored)
    }
}

/// Structured events emitted by the feeder core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service finished `begin` for every component.
    Started,

    /// A door restored (or defaulted) its schedule during `begin`.
    ScheduleLoaded {
        door: DoorId,
        outcome: LoadOutcome,
        schedule: ScheduleRecord,
    },

    /// A door changed motion phase.
    DoorPhaseChanged {
        door: DoorId,
        from: DoorPhase,
        to: DoorPhase,
    },

    /// A door finished its open/close cycle and disarmed itself.
    FeedingComplete(DoorId),

    /// A door's schedule was changed or re-armed by a command.
    ScheduleUpdated {
        door: DoorId,
        schedule: ScheduleRecord,
    },

    /// The cooler restored (or defaulted) its setpoint during `begin`.
    ThermalSettingsLoaded {
        setpoint_f: i16,
        outcome: LoadOutcome,
    },

    /// The cooler setpoint was changed by a command.
    SetpointChanged(i16),

    /// The cooler regulator was switched on or off.
    CoolerToggled(bool),

    /// Periodic status snapshot.
    Status(FeederStatus),
}

/// Point-in-time view of one compartment.
#[derive(Debug, Clone, Serialize)]
pub struct DoorStatus {
    pub id: DoorId,
    pub phase: DoorPhase,
    pub enabled: bool,
    /// Human-readable trigger, e.g. `"Tue 08:00"`.
    pub trigger: heapless::String<16>,
}

/// Point-in-time view of the cooler.
#[derive(Debug, Clone, Serialize)]
pub struct ThermalStatus {
    pub temperature_f: f64,
    pub setpoint_f: i16,
    pub duty_percent: u8,
    pub enabled: bool,
}

/// A status snapshot suitable for logging or display.
#[derive(Debug, Clone, Serialize)]
pub struct FeederStatus {
    pub doors: heapless::Vec<DoorStatus, 2>,
    pub thermal: ThermalStatus,
    pub ticks: u64,
}
