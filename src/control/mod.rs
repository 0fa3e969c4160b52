//! Enclosure temperature control: the cooler regulator and its persisted
//! setpoint.

pub mod settings;
pub mod thermal;
