//! Fixed byte layout of the persistent store.
//!
//! ```text
//! 0                                                capacity-3   capacity
//! ├── door 1 ──┼── door 2 ──┼── thermal ──┼── free ── ┼── WDT dbg ──┤
//! ```
//!
//! Offsets are fixed at build time and never change for the life of the
//! process.  The tail of the store belongs to the watchdog-debug word
//! written by the reset handler; the core must never write there.

use crate::control::settings::ThermalSettings;
use crate::door::schedule::ScheduleRecord;

use super::{MAX_SLOT_LEN, Record};

/// Number of feed compartments on the board.
pub const DOOR_COUNT: usize = 2;

/// Start of each door's [`ScheduleRecord`] slot.
pub const DOOR_SLOT_OFFSETS: [usize; DOOR_COUNT] = [0, ScheduleRecord::SLOT_LEN];

/// Start of the [`ThermalSettings`] slot.
pub const THERMAL_SLOT_OFFSET: usize = DOOR_COUNT * ScheduleRecord::SLOT_LEN;

/// First byte past the last slot.
pub const LAYOUT_END: usize = THERMAL_SLOT_OFFSET + ThermalSettings::SLOT_LEN;

/// Bytes reserved for the watchdog-debug word (two bytes from
/// `capacity - 3`, plus the final byte).
pub const WDT_DEBUG_RESERVED: usize = 3;

/// First reserved byte for a store of `capacity` bytes.
pub const fn reserved_start(capacity: usize) -> usize {
    capacity.saturating_sub(WDT_DEBUG_RESERVED)
}

/// Whether every slot fits below the reserved tail of a store.
pub const fn fits(capacity: usize) -> bool {
    LAYOUT_END <= reserved_start(capacity)
}

const _: () = assert!(ScheduleRecord::SLOT_LEN <= MAX_SLOT_LEN);
const _: () = assert!(ThermalSettings::SLOT_LEN <= MAX_SLOT_LEN);
const _: () = assert!(DOOR_SLOT_OFFSETS[1] >= DOOR_SLOT_OFFSETS[0] + ScheduleRecord::SLOT_LEN);
const _: () = assert!(THERMAL_SLOT_OFFSET >= DOOR_SLOT_OFFSETS[1] + ScheduleRecord::SLOT_LEN);
const _: () = assert!(fits(crate::adapters::eeprom::EEPROM_SIZE));
