//! Actuator drivers and hardware initialisation.

pub mod cooler;
pub mod hw_init;
pub mod servo;
pub mod watchdog;
