//! Scheduled compartment door.
//!
//! Each compartment has a servo-driven door and one weekly trigger.  When
//! the trigger time arrives the door sweeps open, stays open for
//! [`OPEN_WINDOW_MINUTES`], sweeps closed, and disarms itself.
//!
//! ```text
//!            open_at ≤ now < open_at+window
//!  ┌────────┐ ──────────────────────────▶ ┌─────────┐
//!  │ Closed │                             │ Opening │
//!  └────────┘ ◀── travel done ──┐         └────┬────┘
//!       ▲      (disarm + save)  │              │ travel done
//!       │                  ┌────┴────┐    ┌────▼────┐
//!       │                  │ Closing │◀───│  Open   │
//!       │                  └─────────┘    └─────────┘
//!       │                         now ≥ open_at+window
//!       └── disabled / wrong weekday (from any phase)
//! ```

pub mod motion;
pub mod schedule;

use core::fmt;

use chrono::TimeDelta;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::app::events::{AppEvent, LoadOutcome};
use crate::app::ports::{Clock, DoorActuator, EventSink, PersistentStore, StoreError};
use crate::config::DoorProfile;
use crate::storage;
use schedule::ScheduleRecord;

/// Time for a full open or close sweep.
pub const DOOR_TRAVEL_MS: u32 = 3000;

/// How long the door stays open after the trigger time.
pub const OPEN_WINDOW_MINUTES: i64 = 3;

/// Identity of a compartment, assigned by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoorId(pub u8);

impl fmt::Display for DoorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Feed Door {}", self.0)
    }
}

/// Motion phase of a door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorPhase {
    Closed,
    Opening,
    Open,
    Closing,
}

pub struct ScheduledDoor<A: DoorActuator> {
    id: DoorId,
    slot_offset: usize,
    profile: DoorProfile,
    record: ScheduleRecord,
    actuator: A,
    phase: DoorPhase,
    /// Monotonic timestamp of the last phase change.
    phase_changed_at_ms: u32,
}

impl<A: DoorActuator> ScheduledDoor<A> {
    /// Construct a door bound to the store slot at `slot_offset`.
    ///
    /// The schedule is not loaded until [`begin`](Self::begin).
    pub fn new(id: DoorId, slot_offset: usize, profile: DoorProfile, actuator: A) -> Self {
        Self {
            id,
            slot_offset,
            profile,
            record: ScheduleRecord::new(1, 0, 0, false),
            actuator,
            phase: DoorPhase::Closed,
            phase_changed_at_ms: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Restore the schedule, home the door, and report what was loaded.
    ///
    /// A corrupt slot is replaced by a disarmed trigger at the current
    /// wall-clock time and written back immediately.
    pub fn begin(
        &mut self,
        clock: &impl Clock,
        store: &mut impl PersistentStore,
        sink: &mut impl EventSink,
    ) {
        let outcome = match storage::load::<ScheduleRecord>(store, self.slot_offset) {
            Ok(record) => {
                self.record = record;
                LoadOutcome::Restored
            }
            Err(e) => {
                self.record = ScheduleRecord::disabled_at(clock.now());
                self.persist(store);
                LoadOutcome::Defaulted(e)
            }
        };

        self.actuator.attach();
        self.actuator.write_position(self.profile.closed_deg);
        self.phase = DoorPhase::Closed;
        self.phase_changed_at_ms = clock.monotonic_ms();

        sink.emit(&AppEvent::ScheduleLoaded {
            door: self.id,
            outcome,
            schedule: self.record,
        });
    }

    /// Close the door, release the servo, and persist the schedule.
    pub fn shutdown(&mut self, store: &mut impl PersistentStore) {
        self.actuator.write_position(self.profile.closed_deg);
        self.actuator.detach();
        self.phase = DoorPhase::Closed;
        self.persist(store);
        info!("{}: shut down", self.id);
    }

    // ── Per-tick state machine ────────────────────────────────

    /// Advance the door by one polling step.
    ///
    /// A trigger at 23:58 or 23:59 has a window that crosses midnight; the
    /// weekday change then resets the phase to `Closed` with no motion and
    /// the schedule left armed.
    pub fn service(
        &mut self,
        clock: &impl Clock,
        store: &mut impl PersistentStore,
        sink: &mut impl EventSink,
    ) {
        let now = clock.now();
        let now_ms = clock.monotonic_ms();

        if !self.record.enabled || !self.record.is_today(now) {
            if self.phase != DoorPhase::Closed {
                warn!(
                    "{}: schedule no longer active while {:?}, forcing closed",
                    self.id, self.phase
                );
                self.set_phase(DoorPhase::Closed, now_ms, sink);
            }
            return;
        }

        let Some(open_at) = self.record.open_at(now) else {
            return;
        };
        let close_at = open_at + TimeDelta::minutes(OPEN_WINDOW_MINUTES);

        match self.phase {
            DoorPhase::Closed => {
                if now >= open_at && now < close_at {
                    info!("{}: opening", self.id);
                    self.set_phase(DoorPhase::Opening, now_ms, sink);
                }
            }
            DoorPhase::Opening => {
                let (from, to) = (self.profile.closed_deg, self.profile.open_deg);
                if self.drive(from, to, now_ms) {
                    self.set_phase(DoorPhase::Open, now_ms, sink);
                }
            }
            DoorPhase::Open => {
                if now >= close_at {
                    info!("{}: closing", self.id);
                    self.set_phase(DoorPhase::Closing, now_ms, sink);
                }
            }
            DoorPhase::Closing => {
                let (from, to) = (self.profile.open_deg, self.profile.closed_deg);
                if self.drive(from, to, now_ms) {
                    self.set_phase(DoorPhase::Closed, now_ms, sink);
                    // One feeding per arm; must be re-enabled explicitly.
                    self.record.enabled = false;
                    self.persist(store);
                    sink.emit(&AppEvent::FeedingComplete(self.id));
                }
            }
        }
    }

    // ── Commands ──────────────────────────────────────────────

    /// Arm the trigger and persist it immediately.
    pub fn enable(&mut self, store: &mut impl PersistentStore) -> Result<(), StoreError> {
        self.record.enabled = true;
        storage::save(store, self.slot_offset, &self.record)?;
        info!("{}: armed for {}", self.id, self.record);
        Ok(())
    }

    /// Disarm the trigger and persist it.  Takes effect on the next
    /// [`service`](Self::service) call.
    pub fn disable(&mut self, store: &mut impl PersistentStore) -> Result<(), StoreError> {
        self.record.enabled = false;
        storage::save(store, self.slot_offset, &self.record)?;
        info!("{}: disarmed", self.id);
        Ok(())
    }

    /// Replace the trigger time, keeping the armed state.
    pub fn set_schedule(
        &mut self,
        weekday: u8,
        hour: u8,
        minute: u8,
        store: &mut impl PersistentStore,
    ) -> Result<(), StoreError> {
        self.record = ScheduleRecord::new(weekday, hour, minute, self.record.enabled);
        storage::save(store, self.slot_offset, &self.record)?;
        info!("{}: schedule set to {}", self.id, self.record);
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn id(&self) -> DoorId {
        self.id
    }

    pub fn phase(&self) -> DoorPhase {
        self.phase
    }

    pub fn schedule(&self) -> ScheduleRecord {
        self.record
    }

    pub fn is_enabled(&self) -> bool {
        self.record.enabled
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    // ── Internal ──────────────────────────────────────────────

    /// Command the interpolated position for this step.  Returns `true`
    /// once the move is complete.
    fn drive(&mut self, from_deg: u16, to_deg: u16, now_ms: u32) -> bool {
        if self.actuator.read_position() == to_deg {
            return true;
        }
        let elapsed = motion::elapsed_ms(now_ms, self.phase_changed_at_ms);
        let position = motion::interpolate(elapsed, DOOR_TRAVEL_MS, from_deg, to_deg);
        self.actuator.write_position(position);
        elapsed >= DOOR_TRAVEL_MS
    }

    fn set_phase(&mut self, next: DoorPhase, now_ms: u32, sink: &mut impl EventSink) {
        let prev = self.phase;
        debug!("{}: {:?} -> {:?}", self.id, prev, next);
        self.phase = next;
        self.phase_changed_at_ms = now_ms;
        sink.emit(&AppEvent::DoorPhaseChanged {
            door: self.id,
            from: prev,
            to: next,
        });
    }

    fn persist(&self, store: &mut impl PersistentStore) {
        if let Err(e) = storage::save(store, self.slot_offset, &self.record) {
            warn!("{}: failed to persist schedule: {}", self.id, e);
        }
    }
}
