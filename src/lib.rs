//! PetFeeder firmware library.
//!
//! Exposes the pure-logic modules for integration testing and the
//! firmware binary. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod door;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod sensors;
pub mod storage;
