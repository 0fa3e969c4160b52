//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements      | Connects to                    |
//! |--------------|-----------------|--------------------------------|
//! | `eeprom`     | PersistentStore | RAM image mirrored to NVS blob |
//! | `log_sink`   | EventSink       | Serial log output              |
//! | `time`       | Clock           | ESP32 system timer + RTC       |
//!
//! Servo, cooler and thermistor adapters live in `drivers` and `sensors`.

pub mod eeprom;
pub mod log_sink;
pub mod time;
