//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ScheduledDoor / ThermalRegulator (domain)
//! ```
//!
//! Driven adapters (byte store, servo, thermistor, cooler MOSFET, clock,
//! event sinks) implement these traits.  The domain components consume
//! them via generics, so the core never touches hardware directly and
//! every component can be driven by deterministic fakes in tests.

use chrono::NaiveDateTime;

// ───────────────────────────────────────────────────────────────
// Persistent byte store (driven adapter: domain ↔ EEPROM image)
// ───────────────────────────────────────────────────────────────

/// Power-cycle-durable, byte-addressable memory with a CRC primitive.
///
/// Offsets are absolute byte addresses into the store.  Each domain
/// component is handed a disjoint slot offset by the orchestrator (see
/// [`crate::storage::layout`]) and never touches bytes outside it.
///
/// Writes are synchronous: once [`write`](Self::write) and
/// [`commit`](Self::commit) return `Ok`, the bytes survive power loss.
pub trait PersistentStore {
    /// Total addressable size in bytes.
    fn capacity(&self) -> usize;

    fn read_byte(&self, offset: usize) -> Result<u8, StoreError>;

    fn write_byte(&mut self, offset: usize, value: u8) -> Result<(), StoreError>;

    /// CRC-32 over `len` bytes starting at `offset`.
    fn crc(&self, offset: usize, len: usize) -> Result<u32, StoreError>;

    /// Fill `buf` from consecutive bytes starting at `offset`.
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StoreError> {
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = self.read_byte(offset + i)?;
        }
        Ok(())
    }

    /// Write `data` to consecutive bytes starting at `offset`.
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StoreError> {
        for (i, byte) in data.iter().enumerate() {
            self.write_byte(offset + i, *byte)?;
        }
        Ok(())
    }

    /// Flush buffered writes to the backing medium.
    fn commit(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Door actuator (driven adapter: domain → servo)
// ───────────────────────────────────────────────────────────────

/// Positional actuator for a compartment door (hobby servo).
pub trait DoorActuator {
    /// Start driving the output.
    fn attach(&mut self);

    /// Stop driving the output; the actuator relaxes.
    fn detach(&mut self);

    /// Command an absolute angle in degrees.  Implementations clamp to
    /// their mechanical range.
    fn write_position(&mut self, degrees: u16);

    /// Last commanded (or measured) angle in degrees.
    fn read_position(&self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Temperature source (driven adapter: sensor → domain)
// ───────────────────────────────────────────────────────────────

/// Instantaneous enclosure temperature in degrees Fahrenheit.
pub trait TemperatureSource {
    fn read_temperature(&mut self) -> f64;
}

// ───────────────────────────────────────────────────────────────
// Duty output (driven adapter: domain → cooler MOSFET)
// ───────────────────────────────────────────────────────────────

/// A switched load that can be driven fully on/off or with an 8-bit duty.
pub trait DutyOutput {
    fn set_digital(&mut self, on: bool);

    /// 0 = off, 255 = fully on.
    fn set_analog_duty(&mut self, duty: u8);
}

// ───────────────────────────────────────────────────────────────
// Time source
// ───────────────────────────────────────────────────────────────

/// Wall-clock and monotonic time.
///
/// The wall clock may jump when it is re-synchronised from the RTC; the
/// monotonic counter never jumps but wraps at `u32::MAX` milliseconds, so
/// elapsed-time math must use `wrapping_sub`.
pub trait Clock {
    /// Local wall-clock date and time.
    fn now(&self) -> NaiveDateTime;

    /// Free-running millisecond counter.
    fn monotonic_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Emission is fire-and-forget: implementations must
/// not block and cannot fail the caller.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`PersistentStore`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The access runs past the end of the store.
    OutOfBounds { offset: usize, len: usize },
    /// The byte belongs to the watchdog-debug reservation at the end of
    /// the store.
    Reserved { offset: usize },
    /// The backing medium reported a failure.
    Io,
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfBounds { offset, len } => {
                write!(f, "access {}..{} out of bounds", offset, offset + len)
            }
            Self::Reserved { offset } => write!(f, "byte {} is reserved", offset),
            Self::Io => write!(f, "I/O error"),
        }
    }
}

impl core::error::Error for StoreError {}
