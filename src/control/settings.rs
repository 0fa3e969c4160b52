//! Persisted thermostat setpoint.

use serde::{Deserialize, Serialize};

use crate::storage::Record;

/// Setpoint used when the stored settings are unreadable.
pub const DEFAULT_SETPOINT_F: i16 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThermalSettings {
    /// Target enclosure temperature, degrees Fahrenheit.
    pub setpoint_f: i16,
}

impl Default for ThermalSettings {
    fn default() -> Self {
        Self {
            setpoint_f: DEFAULT_SETPOINT_F,
        }
    }
}

impl Record for ThermalSettings {
    const VERSION: u8 = 1;
    const FIELDS_LEN: usize = 2;

    fn encode_fields(&self, out: &mut [u8]) {
        out[..2].copy_from_slice(&self.setpoint_f.to_le_bytes());
    }

    fn decode_fields(bytes: &[u8]) -> Self {
        Self {
            setpoint_f: i16::from_le_bytes([bytes[0], bytes[1]]),
        }
    }
}
