//! Feeder service: the hexagonal core.
//!
//! [`FeederService`] owns both compartment doors and the cooler regulator,
//! assigns each its persistent-store slot, and drives them from one
//! polling loop.  All I/O flows through port traits injected at call
//! sites, so the whole service runs against mock adapters in tests.
//!
//! ```text
//!  Clock ─────────▶ ┌──────────────────────────┐ ──▶ EventSink
//!                   │      FeederService        │
//!  PersistentStore ◀│  door 1 · door 2 · cooler │
//!                   └──────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::SystemConfig;
use crate::control::thermal::ThermalRegulator;
use crate::door::motion;
use crate::door::{DoorId, ScheduledDoor};
use crate::storage::layout::{DOOR_COUNT, DOOR_SLOT_OFFSETS, THERMAL_SLOT_OFFSET};

use super::commands::AppCommand;
use super::events::{AppEvent, DoorStatus, FeederStatus, ThermalStatus};
use super::ports::{
    Clock, DoorActuator, DutyOutput, EventSink, PersistentStore, StoreError, TemperatureSource,
};

// ───────────────────────────────────────────────────────────────
// FeederService
// ───────────────────────────────────────────────────────────────

pub struct FeederService<A, S, O>
where
    A: DoorActuator,
    S: TemperatureSource,
    O: DutyOutput,
{
    doors: [ScheduledDoor<A>; DOOR_COUNT],
    cooler: ThermalRegulator<S, O>,
    status_interval_ms: u32,
    last_status_ms: u32,
    tick_count: u64,
}

impl<A, S, O> FeederService<A, S, O>
where
    A: DoorActuator,
    S: TemperatureSource,
    O: DutyOutput,
{
    /// Construct the service from configuration and the hardware adapters.
    ///
    /// Nothing is loaded until [`begin`](Self::begin).
    pub fn new(config: &SystemConfig, servos: [A; DOOR_COUNT], sensor: S, output: O) -> Self {
        let mut index = 0;
        let doors = servos.map(|servo| {
            let door = ScheduledDoor::new(
                DoorId(index as u8 + 1),
                DOOR_SLOT_OFFSETS[index],
                config.doors[index],
                servo,
            );
            index += 1;
            door
        });

        Self {
            doors,
            cooler: ThermalRegulator::new(THERMAL_SLOT_OFFSET, sensor, output),
            status_interval_ms: config.status_interval_secs.saturating_mul(1000),
            last_status_ms: 0,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Restore every component from the store and home the doors.
    pub fn begin(
        &mut self,
        clock: &impl Clock,
        store: &mut impl PersistentStore,
        sink: &mut impl EventSink,
    ) {
        for door in &mut self.doors {
            door.begin(clock, store, sink);
        }
        self.cooler.begin(store, sink);
        self.last_status_ms = clock.monotonic_ms();
        sink.emit(&AppEvent::Started);
        info!("FeederService started");
    }

    /// Close both doors, switch the cooler off, and persist everything.
    pub fn shutdown(&mut self, store: &mut impl PersistentStore) {
        for door in &mut self.doors {
            door.shutdown(store);
        }
        self.cooler.disable();
        self.cooler.service();
        info!("FeederService shut down");
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one polling step: doors, then cooler, then (if due) a status
    /// report.
    pub fn tick(
        &mut self,
        clock: &impl Clock,
        store: &mut impl PersistentStore,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        for door in &mut self.doors {
            door.service(clock, store, sink);
        }
        self.cooler.service();

        let now_ms = clock.monotonic_ms();
        if motion::elapsed_ms(now_ms, self.last_status_ms) >= self.status_interval_ms {
            self.last_status_ms = now_ms;
            sink.emit(&AppEvent::Status(self.build_status()));
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (front panel, serial console).
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        store: &mut impl PersistentStore,
        sink: &mut impl EventSink,
    ) {
        let result = match cmd {
            AppCommand::EnableDoor(id) => self.with_door(id, store, sink, |d, st| d.enable(st)),
            AppCommand::DisableDoor(id) => self.with_door(id, store, sink, |d, st| d.disable(st)),
            AppCommand::SetSchedule {
                door,
                weekday,
                hour,
                minute,
            } => self.with_door(door, store, sink, |d, st| {
                d.set_schedule(weekday, hour, minute, st)
            }),
            AppCommand::SetThermostat(setpoint_f) => {
                self.cooler.set_temp(setpoint_f, store).map(|()| {
                    sink.emit(&AppEvent::SetpointChanged(setpoint_f));
                })
            }
            AppCommand::EnableCooler => {
                self.cooler.enable();
                sink.emit(&AppEvent::CoolerToggled(true));
                Ok(())
            }
            AppCommand::DisableCooler => {
                self.cooler.disable();
                sink.emit(&AppEvent::CoolerToggled(false));
                Ok(())
            }
        };

        if let Err(e) = result {
            warn!("Command {:?} failed: {}", cmd, e);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a status snapshot of every component.
    pub fn build_status(&self) -> FeederStatus {
        let mut doors = heapless::Vec::new();
        for door in &self.doors {
            let schedule = door.schedule();
            let mut trigger = heapless::String::new();
            // "Www HH:MM" is 9 bytes; cannot overflow the 16-byte label.
            let _ = core::fmt::write(
                &mut trigger,
                format_args!(
                    "{} {:02}:{:02}",
                    schedule.weekday_name(),
                    schedule.hour,
                    schedule.minute
                ),
            );
            let _ = doors.push(DoorStatus {
                id: door.id(),
                phase: door.phase(),
                enabled: door.is_enabled(),
                trigger,
            });
        }

        FeederStatus {
            doors,
            thermal: ThermalStatus {
                temperature_f: self.cooler.temp(),
                setpoint_f: self.cooler.setpoint(),
                duty_percent: self.cooler.pwm_percent(),
                enabled: self.cooler.is_enabled(),
            },
            ticks: self.tick_count,
        }
    }

    /// Look up a door by id.
    pub fn door(&self, id: DoorId) -> Option<&ScheduledDoor<A>> {
        self.doors.iter().find(|d| d.id() == id)
    }

    pub fn regulator(&self) -> &ThermalRegulator<S, O> {
        &self.cooler
    }

    /// Total polling steps executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    /// Apply a schedule command to door `id` and announce the result.
    fn with_door<St: PersistentStore>(
        &mut self,
        id: DoorId,
        store: &mut St,
        sink: &mut impl EventSink,
        f: impl FnOnce(&mut ScheduledDoor<A>, &mut St) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let Some(door) = self.doors.iter_mut().find(|d| d.id() == id) else {
            warn!("Command for unknown door {}", id.0);
            return Ok(());
        };
        f(door, store)?;
        sink.emit(&AppEvent::ScheduleUpdated {
            door: id,
            schedule: door.schedule(),
        });
        Ok(())
    }
}
