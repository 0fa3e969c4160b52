//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{error, info, warn};

use crate::app::events::{AppEvent, LoadOutcome};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => info!("START | feeder core up"),
            AppEvent::ScheduleLoaded {
                door,
                outcome: LoadOutcome::Restored,
                schedule,
            } => {
                info!("{}: alarm set to {}", door, schedule);
            }
            AppEvent::ScheduleLoaded {
                door,
                outcome: LoadOutcome::Defaulted(e),
                schedule,
            } => {
                error!(
                    "{}: EEPROM corrupt ({}), setting alarm time to now ({})",
                    door, e, schedule
                );
            }
            AppEvent::DoorPhaseChanged { door, from, to } => {
                info!("DOOR  | {} {:?} -> {:?}", door, from, to);
            }
            AppEvent::FeedingComplete(door) => {
                info!("{}: feeding complete, alarm disarmed", door);
            }
            AppEvent::ScheduleUpdated { door, schedule } => {
                info!("{}: schedule now {}", door, schedule);
            }
            AppEvent::ThermalSettingsLoaded {
                setpoint_f,
                outcome: LoadOutcome::Restored,
            } => {
                info!("Cooler: loaded set temp of {}F from EEPROM", setpoint_f);
            }
            AppEvent::ThermalSettingsLoaded {
                setpoint_f,
                outcome: LoadOutcome::Defaulted(e),
            } => {
                error!(
                    "Cooler: failed to load set temp from EEPROM ({}), using {}F",
                    e, setpoint_f
                );
            }
            AppEvent::SetpointChanged(setpoint_f) => {
                info!("Cooler: set temp {}F", setpoint_f);
            }
            AppEvent::CoolerToggled(on) => {
                info!("Cooler: {}", if *on { "enabled" } else { "disabled" });
            }
            AppEvent::Status(status) => match serde_json::to_string(status) {
                Ok(json) => info!("STATUS | {}", json),
                Err(e) => warn!("STATUS | serialisation failed: {}", e),
            },
        }
    }
}
